#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the map drawer.
//!
//! Subcommands decompose a single polygon, submit `GeoJSON` shapes to the
//! remote endpoint, or call the proxy endpoint. Without a subcommand an
//! interactive session manages any number of shapes.

mod commands;
mod interactive;
mod vertices;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use map_drawer_registry::DEFAULT_BAND_COUNT;

#[derive(Parser)]
#[command(
    name = "map_drawer",
    about = "Approximate drawn polygons with latitude-band rectangles"
)]
struct Cli {
    /// Endpoint config TOML. Built-in defaults are used when omitted;
    /// `MAP_DRAWER_BASE_URL` overrides the base URL either way.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose one polygon and print its rectangles
    Decompose {
        /// Vertices as "lat,lon; lat,lon; ..."
        #[arg(long, conflicts_with = "geojson", required_unless_present = "geojson")]
        vertices: Option<String>,
        /// Read the polygon from a `GeoJSON` file instead
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Number of latitude bands
        #[arg(long, default_value_t = DEFAULT_BAND_COUNT)]
        bands: u32,
        /// Use an N×N center-in-polygon grid instead of bands
        #[arg(long)]
        grid: Option<u32>,
        /// Print the rectangles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit one shape per `GeoJSON` file to the remote endpoint
    Submit {
        /// `GeoJSON` files, each holding one polygon
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Number of latitude bands per shape
        #[arg(long, default_value_t = DEFAULT_BAND_COUNT)]
        bands: u32,
    },
    /// Send a request through the endpoint's proxy route and print the answer
    Proxy,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(cli.config.as_deref()).await;
    };

    match command {
        Commands::Decompose {
            vertices,
            geojson,
            bands,
            grid,
            json,
        } => {
            let polygon = match (vertices, geojson) {
                (Some(v), _) => vertices::parse_vertices(&v)?,
                (None, Some(path)) => vertices::read_geojson(&path)?,
                (None, None) => return Err("--vertices or --geojson is required".into()),
            };
            commands::decompose(&polygon, bands, grid, json)?;
        }
        Commands::Submit { files, bands } => {
            commands::submit(cli.config.as_deref(), &files, bands).await?;
        }
        Commands::Proxy => {
            commands::proxy(cli.config.as_deref()).await?;
        }
    }

    Ok(())
}
