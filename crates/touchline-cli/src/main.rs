// touchline entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file; stdout carries the JSON report)
// 4. Load the CSV tables
// 5. Run the requested report and print it as JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use touchline_core::config::{self, LoggingConfig};
use touchline_core::data;
use touchline_core::lineup::{self, LineupOutcome};
use touchline_core::scoring;

/// Best-historical lineups and player scores from league CSV tables
#[derive(Debug, Parser)]
#[command(name = "touchline")]
#[command(about = "Best-historical 4-3-3 lineups and composite player scores")]
struct Cli {
    /// Directory holding defaults/, config/, the data files and logs
    /// (defaults to the working directory)
    #[arg(long)]
    base: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Command {
    /// Propose a 4-3-3 for one club
    Lineup {
        /// Club name, matched exactly
        #[arg(long)]
        team: String,
    },
    /// Print the highest composite player scores
    Score {
        /// Number of players to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[derive(Serialize)]
struct NotFoundReport<'a> {
    team: &'a str,
    not_found: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_dir = match cli.base {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    init_tracing(&base_dir, &config.logging)?;
    info!("touchline starting up");

    let data_paths = config.data_paths.rebased(&base_dir);
    let dataset = data::load_dataset(&data_paths).context("failed to load tables")?;
    info!(
        "Loaded {} clubs, {} games, {} appearances, {} players",
        dataset.clubs.len(),
        dataset.games.len(),
        dataset.appearances.len(),
        dataset.players.len()
    );

    let json = match cli.command {
        Command::Lineup { team } => {
            let outcome = lineup::recommend_lineup(&dataset, &team)
                .with_context(|| format!("failed to build lineup for {team}"))?;
            match outcome {
                LineupOutcome::Selected(report) => {
                    info!(
                        "Lineup for {}: {} players from {} matches",
                        team,
                        report.lineup.len(),
                        report.matches
                    );
                    serde_json::to_string_pretty(&report)?
                }
                LineupOutcome::NotFound(reason) => {
                    info!("No lineup for {}: {}", team, reason.label());
                    serde_json::to_string_pretty(&NotFoundReport {
                        team: &team,
                        not_found: reason.label(),
                    })?
                }
            }
        }
        Command::Score { top } => {
            let stats = scoring::player_stats(&dataset, config.scoring.min_games);
            info!("Scoring {} players", stats.len());
            let scored = scoring::top_scored(scoring::compute_player_scores(stats), top);
            serde_json::to_string_pretty(&scored)?
        }
    };

    println!("{json}");
    info!("touchline finished");
    Ok(())
}

/// Initialize tracing to log to a file, leaving stdout for the report.
fn init_tracing(base_dir: &Path, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join(&logging.dir);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("touchline.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("touchline").chain(raw.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_lineup_with_team() {
        let cli = parse(&["lineup", "--team", "FC Bayern München"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Lineup {
                team: "FC Bayern München".into()
            }
        );
        assert!(cli.base.is_none());
    }

    #[test]
    fn parses_inline_values() {
        let cli = parse(&["--base=/srv/touchline", "score", "--top=5"]).unwrap();
        assert_eq!(cli.command, Command::Score { top: 5 });
        assert_eq!(cli.base, Some(PathBuf::from("/srv/touchline")));
    }

    #[test]
    fn score_defaults_top() {
        let cli = parse(&["score"]).unwrap();
        assert_eq!(cli.command, Command::Score { top: 20 });
    }

    #[test]
    fn flag_is_not_taken_as_team_value() {
        assert!(parse(&["lineup", "--team", "--top"]).is_err());
        assert!(parse(&["lineup", "--team"]).is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["lineup"]).is_err());
        assert!(parse(&["score", "--top", "many"]).is_err());
        assert!(parse(&["transfer"]).is_err());
        assert!(parse(&["score", "--verbose"]).is_err());
    }
}
