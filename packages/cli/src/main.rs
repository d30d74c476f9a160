#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the CENIPA occurrence dashboard.
//!
//! `summary` renders one dashboard state and prints it, `serve` starts the
//! HTTP server, and running without a subcommand opens an interactive
//! sidebar that re-renders after every change.
//!
//! Uses `indicatif-log-bridge` (via [`cenipa_map_cli_utils::init_logger`])
//! so the download spinner and log lines share the terminal.

mod explore;
mod report;

use std::sync::Arc;

use cenipa_map_cli_utils::{IndicatifProgress, MultiProgress};
use cenipa_map_dashboard::SidebarState;
use cenipa_map_dashboard::sidebar::{MAX_YEAR, MIN_YEAR};
use cenipa_map_source::cache::OccurrenceCache;
use clap::{Parser, Subcommand};
use dialoguer::Select;

#[derive(Parser)]
#[command(name = "cenipa_map_cli", about = "CENIPA aeronautical occurrence dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for one year and set of classifications
    Summary {
        /// Occurrence year (2008-2018)
        #[arg(long)]
        year: Option<String>,
        /// Classification to include (repeatable), e.g. "SERIOUS INCIDENT".
        /// Defaults to INCIDENT and ACCIDENT.
        #[arg(long = "classification")]
        classifications: Vec<String>,
        /// Also print the matching rows
        #[arg(long)]
        show_table: bool,
    },
    /// Start the HTTP dashboard server
    Serve,
}

/// Top-level choices when no subcommand is given.
enum Tool {
    Explore,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Explore, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Explore => "Explore occurrences",
            Self::Server => "Start server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = cenipa_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Summary {
            year,
            classifications,
            show_table,
        }) => {
            let mut state = SidebarState::default().with_show_table(show_table);
            if let Some(year) = year {
                state = state.with_year_str(&year)?;
            }
            if !classifications.is_empty() {
                state = state.with_classification_labels(
                    classifications.iter().map(String::as_str),
                )?;
            }

            let cache = loading_cache(&multi)?;
            let table = cache.load().await?;
            let attribution = cache.definition().attribution.clone();

            print!("{}", report::format_report(&table, &state, &attribution));
        }
        Some(Commands::Serve) => serve().await?,
        None => {
            println!("CENIPA Occurrence Map ({MIN_YEAR}-{MAX_YEAR})");
            println!();

            let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

            let idx = Select::new()
                .with_prompt("What would you like to do?")
                .items(&labels)
                .default(0)
                .interact()?;

            match Tool::ALL[idx] {
                Tool::Explore => explore::run(&multi).await?,
                Tool::Server => {
                    // actix-web brings its own runtime, so it runs on a
                    // blocking thread instead of nesting inside tokio's.
                    tokio::task::spawn_blocking(|| {
                        actix_web::rt::System::new()
                            .block_on(cenipa_map_server::interactive::run())
                    })
                    .await??;
                }
            }
        }
    }

    Ok(())
}

/// Builds the default occurrence cache with a download spinner attached.
fn loading_cache(
    multi: &MultiProgress,
) -> Result<OccurrenceCache, cenipa_map_source::LoadError> {
    let cache = cenipa_map_server::default_cache()?;
    let progress = IndicatifProgress::load_spinner(multi, "Downloading occurrences");
    Ok(cache.with_progress(progress))
}

async fn serve() -> std::io::Result<()> {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(async {
            let cache = cenipa_map_server::default_cache().map_err(std::io::Error::other)?;
            cenipa_map_server::run_server(Arc::new(cache)).await
        })
    })
    .await
    .map_err(std::io::Error::other)?
}
