mod command;
mod drill;

use anyhow::Result;
use calclearn_core::{DialogController, ExerciseGenerator, Session};
use clap::Parser;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Practice the arithmetic drill in a terminal.
///
/// Type `name <name>`, `answer <number>` (or just the number), press enter for a
/// new exercise, or `quit` to leave.
#[derive(Parser)]
struct Cli {
    /// Seed for the exercise generator, for a reproducible drill
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds of silence before the current question is repeated
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    reprompt_after: u64,

    /// Logging level, written to stderr
    #[arg(long, env = "RUST_LOG", default_value = "WARN")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Parse Command-Line Arguments ---
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Run the Drill ---
    let generator = match args.seed {
        Some(seed) => ExerciseGenerator::seeded(seed),
        None => ExerciseGenerator::from_entropy(),
    };
    let mut controller = DialogController::new(generator);
    let mut session = Session::default();

    drill::run_drill(
        &mut controller,
        &mut session,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
        Duration::from_secs(args.reprompt_after),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reprompt_after_must_be_positive() {
        let zero = Cli::try_parse_from([
            "calclearn-console",
            "--reprompt-after",
            "0",
            "--log-level",
            "WARN",
        ]);
        assert!(zero.is_err());

        let one = Cli::try_parse_from([
            "calclearn-console",
            "--reprompt-after",
            "1",
            "--log-level",
            "WARN",
        ])
        .unwrap();
        assert_eq!(one.reprompt_after, 1);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
