use crate::render::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pitch_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pitch Score",
    about = "Score movie pitches from the command line or serve the scoring API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single pitch and print the dashboard
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["pitch-score-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_repeated_genres() {
        let cli = Cli::try_parse_from([
            "pitch-score-api",
            "score",
            "--text",
            "Uma nave perdida",
            "--genre",
            "Sci-Fi",
            "--genre",
            "Drama",
            "--budget",
            "12000000",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.genre, vec!["Sci-Fi", "Drama"]);
                assert_eq!(args.budget.as_deref(), Some("12000000"));
                assert!(!args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
