#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless front end for the business map.
//!
//! ```text
//! business_map list [--map-type prelist --category ... --search ... --sort name]
//! business_map options <field> [filters]
//! business_map export [filters] [--out-dir .]
//! business_map show <id>
//! business_map levels --zoom 10,12,13,15 [--force-medium]
//! business_map outline
//! ```
//!
//! Datasets and thresholds come from the session config
//! (`BUSINESS_MAP_CONFIG`, `BUSINESS_MAP_DATA_DIR`).

use std::path::PathBuf;
use std::sync::Arc;

use business_map_cli::{CliError, FilterArgs, format_table, simulated_bounds};
use business_map_filter_models::FilterField;
use business_map_session::{MapEvent, MapSession, SessionConfig, UserAction};
use business_map_viewport::SystemClock;
use business_map_viewport_models::LatLng;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "business_map", about = "Explore the business map datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List matching business records
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum number of rows to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Show the values a filter control would offer
    Options {
        /// Filter field, e.g. `district`
        field: FilterField,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export matching records as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show one record and the filters that select it
    Show {
        /// Record ID
        id: String,
    },
    /// Simulate a zoom sequence and print the boundary level at each step
    Levels {
        /// Comma-separated zoom levels
        #[arg(long, value_delimiter = ',', required = true)]
        zoom: Vec<u8>,
        /// Keep the sub-district level on below its zoom threshold
        #[arg(long)]
        force_medium: bool,
        /// Map center latitude
        #[arg(long)]
        lat: Option<f64>,
        /// Map center longitude
        #[arg(long)]
        lng: Option<f64>,
    },
    /// Print the merged city outline as GeoJSON
    Outline,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = SessionConfig::load().map_err(CliError::from)?;
    config.strict = false;

    let client = reqwest::Client::new();
    let datasets = business_map_loader::load_all(&client, &config.datasets).await;
    let mut session = MapSession::new(config, datasets, Arc::new(SystemClock::new()));

    match cli.command {
        Commands::List { filters, limit } => {
            require_records(&session)?;
            filters.apply(&mut session)?;
            let records = session.records();

            for line in format_table(&records[..records.len().min(limit)]) {
                println!("{line}");
            }
            println!("\n{} record(s)", records.len());
        }
        Commands::Options { field, filters } => {
            filters.apply(&mut session)?;
            if session.is_disabled(field) {
                eprintln!("{field} is disabled for the given filters");
                std::process::exit(1);
            }
            for value in session.options(field) {
                println!("{value}");
            }
        }
        Commands::Export { filters, out_dir } => {
            require_records(&session)?;
            filters.apply(&mut session)?;
            let today = chrono::Local::now().date_naive();
            let path = business_map_export::export_to_dir(&out_dir, &session.records(), today)
                .map_err(CliError::from)?;
            println!("{}", path.display());
        }
        Commands::Show { id } => {
            require_records(&session)?;
            if !session.records().iter().any(|r| r.id == id) {
                return Err(CliError::UnknownRecord(id).into());
            }
            session.dispatch(UserAction::SelectRecord { id: id.clone() });
            let Some(record) = session.records().into_iter().find(|r| r.id == id) else {
                return Err(CliError::UnknownRecord(id).into());
            };

            println!("{} ({})", record.name, record.id);
            println!("  {}", record.address);
            if let Some(phone) = &record.phone {
                println!("  Tel. {phone}");
            }
            println!("  {}", record.external_map_url());
            println!();
            for field in FilterField::all() {
                println!(
                    "  {:<16} {}",
                    field.to_string(),
                    session.filters().display_value(*field)
                );
            }
            for command in session.take_commands() {
                log::debug!("View command: {command:?}");
            }
        }
        Commands::Levels {
            zoom,
            force_medium,
            lat,
            lng,
        } => {
            let initial = session.config().view.initial().center;
            let center = LatLng::new(lat.unwrap_or(initial.lat), lng.unwrap_or(initial.lng));
            if force_medium {
                session.dispatch(UserAction::SetForceMedium(true));
            }

            for z in zoom {
                session.handle_event(MapEvent::ZoomChanged {
                    zoom: z,
                    center,
                    bounds: simulated_bounds(center, z),
                });
                println!(
                    "zoom {z:>2}: {:<12} {} boundaries",
                    session.level().to_string(),
                    session.rendered_boundaries().len()
                );
            }
        }
        Commands::Outline => {
            let Some(outline) = session.city_outline() else {
                eprintln!("No district boundaries loaded");
                std::process::exit(1);
            };
            println!("{}", serde_json::to_string_pretty(&outline)?);
        }
    }

    session.end();
    Ok(())
}

fn require_records(session: &MapSession) -> Result<(), CliError> {
    if session.records().is_empty() {
        return Err(CliError::NoData);
    }
    Ok(())
}
