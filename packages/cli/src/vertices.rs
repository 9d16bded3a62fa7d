//! Parsing of polygons typed on the command line.

use std::path::Path;

use map_drawer_decompose::{GeoJsonError, polygon_from_geojson};
use map_drawer_shape_models::{LatLng, Polygon};
use thiserror::Error;

/// Errors from reading a polygon given by the user.
#[derive(Debug, Error)]
pub enum PolygonInputError {
    /// A vertex is not a `lat,lon` pair of numbers.
    #[error("Invalid vertex '{0}': expected 'lat,lon'")]
    InvalidVertex(String),

    /// The `GeoJSON` file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The `GeoJSON` file does not hold a usable polygon.
    #[error(transparent)]
    GeoJson(#[from] GeoJsonError),
}

/// Parses `"lat,lon; lat,lon; ..."` into a polygon.
///
/// Empty segments (e.g. a trailing `;`) are ignored.
///
/// # Errors
///
/// Returns [`PolygonInputError::InvalidVertex`] for the first segment that
/// is not two comma-separated numbers.
pub fn parse_vertices(input: &str) -> Result<Polygon, PolygonInputError> {
    input
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_vertex)
        .collect::<Result<Vec<_>, _>>()
        .map(Polygon::new)
}

fn parse_vertex(segment: &str) -> Result<LatLng, PolygonInputError> {
    let invalid = || PolygonInputError::InvalidVertex(segment.to_string());

    let mut parts = segment.split(',').map(str::trim);
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let lat: f64 = lat.parse().map_err(|_| invalid())?;
    let lon: f64 = lon.parse().map_err(|_| invalid())?;
    Ok(LatLng::new(lat, lon))
}

/// Reads a polygon from a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`PolygonInputError`] if the file cannot be read or holds no
/// polygon.
pub fn read_geojson(path: &Path) -> Result<Polygon, PolygonInputError> {
    let text = std::fs::read_to_string(path).map_err(|source| PolygonInputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(polygon_from_geojson(&text)?)
}

/// Reads a polygon typed at a prompt: an existing file is read as
/// `GeoJSON`, anything else is parsed as a vertex list.
///
/// # Errors
///
/// Returns [`PolygonInputError`] if the file holds no polygon or the text
/// is not a vertex list.
pub fn polygon_from_input(input: &str) -> Result<Polygon, PolygonInputError> {
    let path = Path::new(input.trim());
    if path.is_file() {
        read_geojson(path)
    } else {
        parse_vertices(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_separated_pairs() {
        let polygon = parse_vertices("51.5,-0.1; 51.52,-0.08;51.5,-0.05;").unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon.vertices()[1], LatLng::new(51.52, -0.08));
    }

    #[test]
    fn rejects_malformed_vertex() {
        assert!(matches!(
            parse_vertices("1,2; 3"),
            Err(PolygonInputError::InvalidVertex(v)) if v == "3"
        ));
        assert!(matches!(
            parse_vertices("1,2,3"),
            Err(PolygonInputError::InvalidVertex(_))
        ));
        assert!(matches!(
            parse_vertices("1,north"),
            Err(PolygonInputError::InvalidVertex(_))
        ));
    }

    #[test]
    fn empty_input_is_an_empty_polygon() {
        assert!(parse_vertices("  ").unwrap().is_empty());
    }

    #[test]
    fn reads_geojson_file() {
        let path = std::env::temp_dir().join("map_drawer_cli_read_geojson.json");
        std::fs::write(
            &path,
            r#"{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,0]]]}"#,
        )
        .unwrap();

        let polygon = read_geojson(&path).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon.vertices()[1], LatLng::new(0.0, 10.0));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn input_naming_a_file_is_read_as_geojson_even_with_commas() {
        let path = std::env::temp_dir().join("map_drawer_cli_block,north.json");
        std::fs::write(
            &path,
            r#"{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,4],[0,4],[0,0]]]}"#,
        )
        .unwrap();

        let input = format!("  {}  ", path.display());
        let polygon = polygon_from_input(&input).unwrap();
        assert_eq!(polygon.len(), 4);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn other_input_is_parsed_as_vertices() {
        let polygon = polygon_from_input("0,0; 0,4; 4,4").unwrap();
        assert_eq!(polygon.vertices()[2], LatLng::new(4.0, 4.0));
        assert!(matches!(
            polygon_from_input("no_such_file.json"),
            Err(PolygonInputError::InvalidVertex(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("map_drawer_cli_missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            read_geojson(&path),
            Err(PolygonInputError::Io { .. })
        ));
    }
}
