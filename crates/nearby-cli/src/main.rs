mod locate;
mod render;
mod search;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nearby_core::Coordinate;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nearby")]
#[command(about = "Find essentials and medical facilities near a location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// User position. Both or neither must be given; with neither, no search runs.
#[derive(Debug, Args)]
struct OriginArgs {
    /// Latitude in decimal degrees
    #[arg(long, env = "NEARBY_LAT", requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, env = "NEARBY_LON", requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl OriginArgs {
    fn coordinate(&self) -> anyhow::Result<Option<Coordinate>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(
                Coordinate::new(lat, lon).context("invalid --lat/--lon")?,
            )),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Args)]
struct DatasetArgs {
    /// Read the GeoJSON dataset from a local file instead of `NEARBY_DATASET_URL`
    #[arg(long, value_name = "PATH")]
    dataset_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Nearest medical facilities and essentials, filtered by category
    Search {
        #[command(flatten)]
        origin: OriginArgs,
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Deselect a category (repeatable)
        #[arg(long = "hide", value_name = "CATEGORY")]
        hide: Vec<String>,
        /// Deselect results that have no category
        #[arg(long)]
        hide_uncategorized: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Category counts for the nearest results
    Facets {
        #[command(flatten)]
        origin: OriginArgs,
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long)]
        json: bool,
    },
    /// Name of the locality at a coordinate
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearby_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            origin,
            dataset,
            hide,
            hide_uncategorized,
            json,
        } => {
            search::run_search(
                &config,
                origin.coordinate()?,
                dataset.dataset_file.as_deref(),
                &hide,
                hide_uncategorized,
                json,
            )
            .await
        }
        Commands::Facets {
            origin,
            dataset,
            json,
        } => {
            search::run_facets(
                &config,
                origin.coordinate()?,
                dataset.dataset_file.as_deref(),
                json,
            )
            .await
        }
        Commands::Locate { lat, lon } => {
            let at = Coordinate::new(lat, lon).context("invalid --lat/--lon")?;
            locate::run_locate(&config, at).await
        }
    }
}
