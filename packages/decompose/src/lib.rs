#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Riemann-style rectangle decomposition of drawn polygons.
//!
//! The polygon's latitude range is cut into equal horizontal bands. Each
//! band's midline is intersected with every polygon edge and the outermost
//! crossings give the band's longitude extent. The result approximates the
//! polygon footprint with one axis-aligned rectangle per band.
//!
//! Only the two outermost crossings of a band are used, so bands that cross
//! a concave polygon more than twice span the gaps between lobes. This is a
//! known approximation limit and is kept as-is.
//!
//! Also provides a center-in-polygon grid decomposition ([`grid_cells`]) and
//! `GeoJSON` polygon import ([`polygon_from_geojson`]).

pub mod grid;
pub mod import;

use std::num::NonZeroU32;

use geo::BoundingRect as _;
use map_drawer_shape_models::{LatLng, Polygon, Rectangle};

pub use grid::grid_cells;
pub use import::{GeoJsonError, polygon_from_geojson};

/// Latitude extent of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeRange {
    pub min: f64,
    pub max: f64,
}

/// Computes the bounding box of the polygon as a `geo` rectangle
/// (`x` = longitude, `y` = latitude).
///
/// Returns `None` for an empty polygon.
#[must_use]
pub fn bounding_rect(polygon: &Polygon) -> Option<geo::Rect<f64>> {
    let ring: geo::LineString<f64> = polygon
        .vertices()
        .iter()
        .map(|v| geo::coord! { x: v.lon, y: v.lat })
        .collect();
    ring.bounding_rect()
}

/// Latitude bounds of the polygon, or `None` for an empty polygon.
#[must_use]
pub fn latitude_range(polygon: &Polygon) -> Option<LatitudeRange> {
    bounding_rect(polygon).map(|rect| LatitudeRange {
        min: rect.min().y,
        max: rect.max().y,
    })
}

/// Decomposes `polygon` into at most `band_count` rectangles, one per
/// latitude band, ordered south to north.
///
/// Polygons with fewer than three vertices yield an empty vector. Bands
/// whose midline touches no edge are skipped; a band with a single crossing
/// yields a zero-width rectangle.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn decompose(polygon: &Polygon, band_count: NonZeroU32) -> Vec<Rectangle> {
    if !polygon.is_valid() {
        log::debug!(
            "Skipping decomposition of polygon with {} vertices",
            polygon.len()
        );
        return Vec::new();
    }

    let Some(range) = latitude_range(polygon) else {
        return Vec::new();
    };

    let bands = band_count.get();
    let band_height = (range.max - range.min) / f64::from(bands);
    let mut rectangles = Vec::new();

    for i in 0..bands {
        let current_lat = range.min + f64::from(i) * band_height;
        let next_lat = current_lat + band_height;
        let mid_lat = current_lat + band_height / 2.0;

        let crossings = midline_crossings(polygon, mid_lat);

        let (Some(&lon_min), Some(&lon_max)) = (crossings.first(), crossings.last()) else {
            continue;
        };

        rectangles.push(Rectangle {
            lat_min: current_lat,
            lon_min,
            lat_max: next_lat,
            lon_max,
        });
    }

    rectangles
}

/// Longitudes at which the polygon's edges cross the parallel `lat`,
/// sorted ascending with exact duplicates removed.
#[must_use]
pub fn midline_crossings(polygon: &Polygon, lat: f64) -> Vec<f64> {
    let mut crossings: Vec<f64> = polygon
        .edges()
        .filter_map(|(a, b)| edge_crossing(a, b, lat))
        .collect();

    crossings.sort_by(f64::total_cmp);
    crossings.dedup();
    crossings
}

/// Longitude where the edge `a`-`b` crosses the parallel `lat`.
///
/// The test is inclusive at both endpoints. A horizontal edge lying exactly
/// on `lat` reports its midpoint longitude; any other horizontal edge never
/// crosses.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn edge_crossing(a: LatLng, b: LatLng, lat: f64) -> Option<f64> {
    let spans = (a.lat <= lat && b.lat >= lat) || (a.lat >= lat && b.lat <= lat);
    if !spans {
        return None;
    }

    if a.lat == b.lat {
        return Some(f64::midpoint(a.lon, b.lon));
    }

    Some(a.lon + (lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat))
}
