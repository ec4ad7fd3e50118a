//! Deterministic pitch scoring behind a replaceable asynchronous boundary.
//!
//! The [`scoring`] module holds the heuristic engine, the backend trait it
//! implements, and the view models the presentation layer renders. The
//! [`session`] module tracks the single in-flight submission of a form.

pub mod config;
pub mod error;
pub mod scoring;
pub mod session;
pub mod telemetry;
