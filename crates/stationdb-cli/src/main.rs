mod enrich;
mod files;
mod match_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stationdb_enrich::DEFAULT_MATCH_THRESHOLD;
use tracing_subscriber::EnvFilter;

use crate::enrich::EnrichArgs;
use crate::match_cmd::{parse_threshold, MatchArgs};

#[derive(Debug, Parser)]
#[command(name = "stationdb-cli")]
#[command(about = "Enrich fuel station records with place-search data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Enrich a station CSV and write one JSON result per station
    Enrich {
        /// Station CSV with `Station Name`, `Station Address`, `Phone Number`
        /// and `County Name` columns
        #[arg(long)]
        input: PathBuf,
        /// Where to write the JSON results array
        #[arg(long)]
        output: PathBuf,
        /// Only process the first N stations
        #[arg(long)]
        limit: Option<usize>,
        /// Also write the batch summary as JSON
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Print the queries and worst-case cost without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Score one address pair offline and print the match decision
    Match {
        #[arg(long)]
        source_address: String,
        #[arg(long)]
        candidate_address: String,
        #[arg(long)]
        source_name: Option<String>,
        #[arg(long)]
        candidate_name: Option<String>,
        /// Address similarity required for an exact match
        #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD, value_parser = parse_threshold)]
        threshold: f64,
    },
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Enrich {
            input,
            output,
            limit,
            summary,
            dry_run,
        } => {
            let config = stationdb_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            tracing::debug!(?config, "loaded configuration");

            let args = EnrichArgs {
                input: &input,
                output: &output,
                limit,
                summary: summary.as_deref(),
                dry_run,
            };
            enrich::run_enrich(&config, &args).await
        }
        Commands::Match {
            source_address,
            candidate_address,
            source_name,
            candidate_name,
            threshold,
        } => {
            init_tracing("warn")?;
            match_cmd::run_match(&MatchArgs {
                source_address: &source_address,
                candidate_address: &candidate_address,
                source_name: source_name.as_deref(),
                candidate_name: candidate_name.as_deref(),
                threshold,
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
