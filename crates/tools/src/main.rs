use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use catalog::{BuiltinCatalog, InMemoryDatasets, Resolution};
use clap::{Parser, Subcommand};
use layers::{MapAssembler, MapConfig, RenderablePayload};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the region map as SVG")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a full SVG document
    Render {
        /// Geometry detail: low or medium
        #[arg(long, default_value = "low")]
        tier: String,

        /// Region code to highlight (exact match)
        #[arg(long)]
        select: Option<String>,

        /// Use this GeoJSON FeatureCollection instead of the built-in dataset
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// JSON style config (falls back to WORLDMAP_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List known region codes and display names as JSON
    Countries,

    /// List city markers as JSON
    Cities,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    match args.command {
        Command::Render {
            tier,
            select,
            geojson,
            out,
            config,
        } => {
            let config_path = config.or_else(|| env::var_os("WORLDMAP_CONFIG").map(PathBuf::from));
            let config = match config_path {
                Some(path) => MapConfig::load(path)?,
                None => MapConfig::default(),
            };
            let geojson = geojson
                .map(|p| fs::read_to_string(&p).map_err(|e| format!("read {p:?}: {e}")))
                .transpose()?;

            let payload = render(&tier, select.as_deref(), geojson.as_deref(), config)?;
            let document = payload.to_svg_document();
            match out {
                Some(path) => write_output(&path, &document)?,
                None => println!("{document}"),
            }
            info!(hash = %payload.content_hash(), "rendered map");
        }
        Command::Countries => println!("{}", countries_json()?),
        Command::Cities => println!("{}", cities_json()?),
    }
    Ok(())
}

/// Builds the payload for `tier`, from `geojson` when given.
fn render(
    tier: &str,
    select: Option<&str>,
    geojson: Option<&str>,
    config: MapConfig,
) -> Result<RenderablePayload, Box<dyn Error>> {
    let tier: Resolution = tier.parse().map_err(layers::MapError::from)?;
    let payload = match geojson {
        Some(text) => {
            let mut datasets = InMemoryDatasets::new();
            datasets
                .insert_geojson(tier, text)
                .map_err(layers::MapError::from)?;
            MapAssembler::new(datasets, BuiltinCatalog, config).build_payload(tier, select)?
        }
        None => MapAssembler::new(catalog::BuiltinDatasets, BuiltinCatalog, config)
            .build_payload(tier, select)?,
    };
    Ok(payload)
}

fn write_output(path: &Path, document: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("create {parent:?}: {e}"))?;
    }
    fs::write(path, document).map_err(|e| format!("write {path:?}: {e}"))?;
    Ok(())
}

#[derive(Serialize)]
struct CountryRow {
    code: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct CityRow {
    id: String,
    name: &'static str,
    lon_deg: f64,
    lat_deg: f64,
}

fn countries_json() -> Result<String, serde_json::Error> {
    let rows: Vec<CountryRow> = catalog::countries_by_name()
        .into_iter()
        .map(|c| CountryRow {
            code: c.code,
            name: c.name,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

fn cities_json() -> Result<String, serde_json::Error> {
    let rows: Vec<CityRow> = catalog::CITIES
        .iter()
        .map(|c| CityRow {
            id: format!("{}{}", layers::augment::CITY_ID_PREFIX, c.name),
            name: c.name,
            lon_deg: c.coordinate.lon_deg,
            lat_deg: c.coordinate.lat_deg,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
