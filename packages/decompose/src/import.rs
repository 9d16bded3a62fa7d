//! `GeoJSON` polygon import.
//!
//! Lets polygons drawn in other tools be loaded as shapes. Positions in
//! `GeoJSON` are `[lon, lat]`; they are flipped into [`LatLng`] order here.

use geojson::GeoJson;
use map_drawer_shape_models::{LatLng, Polygon};
use thiserror::Error;

/// Errors from reading a polygon out of a `GeoJSON` document.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    Parse(#[from] geojson::Error),

    /// The document has no geometry to read.
    #[error("GeoJSON document has no geometry")]
    MissingGeometry,

    /// The geometry is not a polygon or multipolygon.
    #[error("Unsupported GeoJSON geometry: {0}")]
    UnsupportedGeometry(String),
}

/// Reads the exterior ring of the first polygon in a `GeoJSON` document.
///
/// Accepts a bare geometry, a feature, or a feature collection (first
/// feature). For a `MultiPolygon` the first member is used. The closing
/// vertex of the ring is dropped since [`Polygon`] is implicitly closed.
///
/// # Errors
///
/// Returns [`GeoJsonError`] if the document cannot be parsed or does not
/// contain a polygon.
pub fn polygon_from_geojson(input: &str) -> Result<Polygon, GeoJsonError> {
    let geojson: GeoJson = input.parse()?;

    let geometry = match geojson {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry.ok_or(GeoJsonError::MissingGeometry)?,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.geometry)
            .ok_or(GeoJsonError::MissingGeometry)?,
    };

    let geo_geom: geo::Geometry<f64> = geometry.try_into()?;
    let polygon = match geo_geom {
        geo::Geometry::Polygon(p) => p,
        geo::Geometry::MultiPolygon(mp) => mp
            .0
            .into_iter()
            .next()
            .ok_or(GeoJsonError::MissingGeometry)?,
        other => {
            return Err(GeoJsonError::UnsupportedGeometry(
                geometry_name(&other).to_string(),
            ));
        }
    };

    let mut vertices: Vec<LatLng> = polygon
        .exterior()
        .coords()
        .map(|c| LatLng::new(c.y, c.x))
        .collect();

    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    log::debug!("Imported GeoJSON polygon with {} vertices", vertices.len());

    Ok(Polygon::new(vertices))
}

const fn geometry_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bare_polygon_geometry() {
        let input = r#"{
            "type": "Polygon",
            "coordinates": [[[-0.1, 51.5], [-0.08, 51.52], [-0.05, 51.5], [-0.1, 51.5]]]
        }"#;
        let polygon = polygon_from_geojson(input).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon.vertices()[0], LatLng::new(51.5, -0.1));
        assert_eq!(polygon.vertices()[1], LatLng::new(51.52, -0.08));
    }

    #[test]
    fn reads_first_feature_of_collection() {
        let input = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "block"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]]
                }
            }]
        }"#;
        let polygon = polygon_from_geojson(input).unwrap();
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.vertices()[1], LatLng::new(0.0, 10.0));
    }

    #[test]
    fn multipolygon_uses_first_member() {
        let input = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]],
                [[[50.0, 50.0], [60.0, 50.0], [60.0, 60.0], [50.0, 50.0]]]
            ]
        }"#;
        let polygon = polygon_from_geojson(input).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon.vertices()[0], LatLng::new(1.0, 1.0));
        assert_eq!(polygon.vertices()[2], LatLng::new(2.0, 2.0));
    }

    #[test]
    fn rejects_points() {
        let input = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            polygon_from_geojson(input),
            Err(GeoJsonError::UnsupportedGeometry(name)) if name == "Point"
        ));
    }

    #[test]
    fn rejects_feature_without_geometry() {
        let input = r#"{"type": "Feature", "properties": {}, "geometry": null}"#;
        assert!(matches!(
            polygon_from_geojson(input),
            Err(GeoJsonError::MissingGeometry)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            polygon_from_geojson("not json"),
            Err(GeoJsonError::Parse(_))
        ));
    }
}
