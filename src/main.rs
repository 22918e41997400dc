use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use rhythm_ledger_lib::commands::{ledger, AppState, CommandError, CommandResult};
use rhythm_ledger_lib::config::LedgerConfig;
use rhythm_ledger_lib::utils::logger::init_logging;

#[derive(Debug, Parser)]
#[command(name = "rhythm-ledger")]
#[command(about = "Play history, rankings and activity calendars from the score ledger")]
struct Cli {
    /// Overrides LEDGER_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Distinct tracks played, with best scores
    History(PagedArgs),
    /// Every attempt on one track with the best-attempt breakdown
    Timeline(TrackArgs),
    /// Days of a month with at least one attempt
    Calendar(CalendarArgs),
    /// Leaderboard rank on one track
    Rank(TrackArgs),
    /// Liked tracks
    Likes(PagedArgs),
}

#[derive(Debug, Args)]
struct PagedArgs {
    #[arg(long)]
    user: i64,
    /// 0 or below returns everything
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,
}

#[derive(Debug, Args)]
struct TrackArgs {
    #[arg(long)]
    user: i64,
    #[arg(long)]
    track: i64,
}

#[derive(Debug, Args)]
struct CalendarArgs {
    #[arg(long)]
    user: i64,
    #[arg(long)]
    year: String,
    #[arg(long)]
    month: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = LedgerConfig::from_env();
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    if let Err(err) = init_logging(&config) {
        eprintln!("failed to initialize logging: {err}");
    }

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(err) => return report(Err::<(), _>(CommandError::from(err))),
    };
    let db = state.db();
    info!(target: "app::ledger", db_path = %db.path().display(), "ledger opened");

    match cli.command {
        Commands::History(args) => {
            report(ledger::history_played_tracks(&state, args.user, Some(args.page)).await)
        }
        Commands::Timeline(args) => {
            report(ledger::history_track_timeline(&state, args.user, args.track).await)
        }
        Commands::Calendar(args) => report(
            ledger::history_play_calendar(&state, args.user, args.year, args.month).await,
        ),
        Commands::Rank(args) => {
            report(ledger::ranking_track_rank(&state, args.user, args.track).await)
        }
        Commands::Likes(args) => {
            report(ledger::likes_list(&state, args.user, Some(args.page)).await)
        }
    }
}

fn report<T: Serialize>(result: CommandResult<T>) -> ExitCode {
    let (rendered, failed) = match &result {
        Ok(value) => (serde_json::to_string_pretty(value), false),
        Err(err) => (serde_json::to_string_pretty(err), true),
    };

    match (rendered, failed) {
        (Ok(json), false) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        (Ok(json), true) => {
            eprintln!("{json}");
            ExitCode::FAILURE
        }
        (Err(err), _) => {
            eprintln!("failed to render output: {err}");
            ExitCode::FAILURE
        }
    }
}
