//! Standalone table fetch utility.
//!
//! Connects with the environment's database parameters, snapshots one table
//! and prints its first rows. Failures are reported as a notice, never as a
//! panic or a non-zero exit: re-invoke to retry.

use clap::Parser;
use sql_assistant::config::{DEFAULT_TABLE, DbConfig};
use sql_assistant::db::fetch_table;
use tracing::error;
use tracing_subscriber::EnvFilter;

const HEAD_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "fetch-table", version, about)]
struct Cli {
    #[command(flatten)]
    db: DbConfig,

    /// Table to snapshot
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match fetch_table(&cli.db, &cli.table).await {
        Ok(snapshot) => {
            println!("Data fetched successfully:");
            print!("{}", snapshot.head(HEAD_ROWS).to_ascii_table());
            if snapshot.row_count() > HEAD_ROWS {
                println!("(showing first {} of {} rows)", HEAD_ROWS, snapshot.row_count());
            }
        }
        Err(e) => {
            match e.suggestion() {
                Some(suggestion) => error!(error = %e, suggestion = %suggestion, "Fetch failed"),
                None => error!(error = %e, "Fetch failed"),
            }
            println!("Failed to fetch data");
        }
    }
}
