//! Uniform grid decomposition.
//!
//! Splits the bounding box into `divisions × divisions` cells and keeps the
//! cells whose center falls inside the polygon. Unlike band decomposition
//! this models concave gaps, at the cost of many more rectangles.

use std::num::NonZeroU32;

use geo::Contains as _;
use map_drawer_shape_models::{Polygon, Rectangle};

use crate::bounding_rect;

/// Returns the grid cells whose centers lie strictly inside `polygon`,
/// ordered south to north and then west to east.
///
/// Polygons with fewer than three vertices yield an empty vector.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn grid_cells(polygon: &Polygon, divisions: NonZeroU32) -> Vec<Rectangle> {
    if !polygon.is_valid() {
        return Vec::new();
    }

    let Some(bbox) = bounding_rect(polygon) else {
        return Vec::new();
    };

    let exterior: geo::LineString<f64> = polygon
        .vertices()
        .iter()
        .map(|v| geo::coord! { x: v.lon, y: v.lat })
        .collect();
    let shape = geo::Polygon::new(exterior, vec![]);

    let n = divisions.get();
    let lat_step = bbox.height() / f64::from(n);
    let lon_step = bbox.width() / f64::from(n);

    let mut cells = Vec::new();
    for row in 0..n {
        let lat_min = bbox.min().y + f64::from(row) * lat_step;
        for col in 0..n {
            let lon_min = bbox.min().x + f64::from(col) * lon_step;
            let center = geo::Point::new(lon_min + lon_step / 2.0, lat_min + lat_step / 2.0);

            if shape.contains(&center) {
                cells.push(Rectangle {
                    lat_min,
                    lon_min,
                    lat_max: lat_min + lat_step,
                    lon_max: lon_min + lon_step,
                });
            }
        }
    }

    log::debug!(
        "Grid decomposition kept {} of {} cells",
        cells.len(),
        u64::from(n) * u64::from(n)
    );

    cells
}
