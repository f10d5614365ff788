use clap::{Parser, Subcommand};
use geodata_ingest::{run_join, IngestPaths};
use service_core::observability::init_cli_tracing;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geodata-ingest", version, about = "Build processed GeoJSON layers")]
struct Cli {
    /// Directory holding the raw CSV and GeoJSON inputs
    #[arg(long, env = "DATASETS_DIR", default_value = "datasets")]
    datasets_dir: PathBuf,

    /// Directory for processed layers [default: <datasets-dir>/processed]
    #[arg(long, env = "PROCESSED_DIR")]
    output_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join area statistics onto community-area polygons
    #[command(alias = "cca25")]
    Join {
        /// Region whose naming conventions to use (e.g. chicago)
        region: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_cli_tracing(&cli.log_level);

    let paths = IngestPaths::new(cli.datasets_dir, cli.output_dir);

    match cli.command {
        Command::Join { region } => {
            run_join(&region, &paths).map_err(|e| {
                tracing::error!(error = %e, "Join failed");
                e
            })?;
        }
    }

    Ok(())
}
