use crate::infra::build_session;
use clap::Args;
use pitch_score::config::AppConfig;
use pitch_score::error::AppError;
use pitch_score::scoring::views::ScoreDashboard;
use pitch_score::scoring::{InputValidationError, PitchForm};
use pitch_score::session::SubmissionOutcome;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Pitch text (logline or synopsis)
    #[arg(long)]
    pub(crate) text: String,
    /// Genre label; repeat for several genres
    #[arg(long)]
    pub(crate) genre: Vec<String>,
    /// Free-form tone, e.g. "dark" or "feel-good"
    #[arg(long)]
    pub(crate) tone: Option<String>,
    /// Audience rating (G, PG, PG-13, R, NC-17)
    #[arg(long)]
    pub(crate) rating: Option<String>,
    /// Budget hint in USD
    #[arg(long)]
    pub(crate) budget: Option<String>,
    /// Print the raw score report as JSON instead of the dashboard
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    fn into_form(self) -> PitchForm {
        PitchForm {
            text: self.text,
            genres: self.genre,
            tone: self.tone.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            budget: self.budget.unwrap_or_default(),
        }
    }
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let session = build_session(&config.scoring)?;
    let as_json = args.json;

    let normalized = args.into_form().normalize()?;
    if !as_json {
        render_corrections(&normalized.corrections);
    }

    match session.submit(normalized.request).await {
        SubmissionOutcome::Resolved { response, .. } => {
            if as_json {
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{json}"),
                    Err(err) => println!("Score report unavailable: {err}"),
                }
            } else {
                render_dashboard(&ScoreDashboard::from_response(&response));
            }
            Ok(())
        }
        SubmissionOutcome::Failed { error, .. } => Err(error.into()),
        SubmissionOutcome::Superseded { sequence } => {
            println!("Submission {sequence} was superseded before it finished");
            Ok(())
        }
    }
}

fn render_corrections(corrections: &[InputValidationError]) {
    if corrections.is_empty() {
        return;
    }
    println!("Input corrections:");
    for correction in corrections {
        println!("  - {correction}");
    }
}

pub(crate) fn render_dashboard(dashboard: &ScoreDashboard) {
    println!(
        "Success probability: {}% ({:.0}° of the gauge)",
        dashboard.gauge.percent, dashboard.gauge.sweep_degrees
    );
    println!("Genres: {}", dashboard.genres.join(", "));

    println!("\nProfile");
    for axis in &dashboard.radar {
        println!("  {:<22} {}", axis.label, bar(axis.value));
    }

    println!("\nDrivers");
    for driver in &dashboard.drivers.bars {
        let sign = if driver.positive { '+' } else { '-' };
        println!(
            "  {:<22} {sign}{:.3}",
            driver.label,
            driver.impact.abs()
        );
    }

    println!("\nSimilar titles");
    for row in &dashboard.similar_titles {
        println!(
            "  {:<24} {}  {:>4}  {:>5}",
            row.title, row.year, row.similarity, row.return_multiple
        );
    }
}

fn bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * 20.0).round() as usize;
    format!("{}{} {:.2}", "#".repeat(filled), ".".repeat(20 - filled), value)
}
