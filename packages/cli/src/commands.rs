//! Handlers for the non-interactive subcommands.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use map_drawer_decompose::{decompose as decompose_bands, grid_cells};
use map_drawer_registry::{RegistryError, ShapeRegistry};
use map_drawer_shape_models::{Polygon, Rectangle, ReportedRectangle};
use map_drawer_submission::{SubmissionClient, SubmissionConfig};

use crate::vertices::read_geojson;

/// Prints the decomposition of a single polygon.
///
/// # Errors
///
/// Returns an error if `bands` or `grid` is 0, or JSON output fails.
pub fn decompose(
    polygon: &Polygon,
    bands: u32,
    grid: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rectangles = match grid {
        Some(divisions) => {
            let divisions = NonZeroU32::new(divisions).ok_or("--grid must be at least 1")?;
            grid_cells(polygon, divisions)
        }
        None => {
            let bands = NonZeroU32::new(bands).ok_or(RegistryError::InvalidBandCount(bands))?;
            decompose_bands(polygon, bands)
        }
    };

    if json {
        let reported: Vec<ReportedRectangle> =
            rectangles.iter().map(Rectangle::to_reported).collect();
        println!("{}", serde_json::to_string_pretty(&reported)?);
    } else {
        print_rectangles(polygon, &rectangles);
    }

    Ok(())
}

/// Creates one queued shape per file and sends them as a single batch.
///
/// # Errors
///
/// Returns an error if a file cannot be read, the config is invalid, or the
/// batch fails as a whole.
pub async fn submit(
    config: Option<&Path>,
    files: &[PathBuf],
    bands: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = ShapeRegistry::new();

    for path in files {
        let polygon = read_geojson(path)?;
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        let id = registry.create_shape(polygon, name.as_deref(), bands)?;
        registry.set_send_to_server(id, true)?;
    }

    let client = SubmissionClient::new(SubmissionConfig::load(config)?)?;
    let batch = registry.prepare_batch();
    let outcome = client.process_batch(batch).await;
    registry.apply_feedback(outcome.feedback());

    for shape in registry.shapes() {
        if let Some(feedback) = registry.feedback(shape.id()) {
            println!("{}: {}", shape.label(), feedback.message);
        }
    }

    outcome.result.map(|_| ()).map_err(Into::into)
}

/// Calls the proxy endpoint and prints its JSON answer.
///
/// # Errors
///
/// Returns an error if the config is invalid or the request fails.
pub async fn proxy(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let client = SubmissionClient::new(SubmissionConfig::load(config)?)?;
    let body = client.proxy_request().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Prints rectangles in their reported form, one per line.
pub fn print_rectangles(polygon: &Polygon, rectangles: &[Rectangle]) {
    if !polygon.is_valid() {
        println!("No rectangles calculated (polygon needs at least 3 points).");
        return;
    }
    if rectangles.is_empty() {
        println!("No rectangles calculated.");
        return;
    }

    println!("Calculated Rectangles:");
    for rect in rectangles {
        println!("  {}", rect.to_reported());
    }
}
