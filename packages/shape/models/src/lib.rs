#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry value types shared by the decomposition engine, the shape
//! registry and the submission client.
//!
//! Coordinates are plain WGS84 degrees. Vertices are stored latitude first,
//! matching the `[lat, lon]` pairs emitted by the drawing layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of fractional digits used when rectangles are reported to
/// external consumers.
pub const REPORTED_PRECISION: usize = 6;

/// Minimum number of vertices a polygon needs to enclose an area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A single vertex. Serialized as a `[lat, lon]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(value: LatLng) -> Self {
        (value.lat, value.lon)
    }
}

/// An implicitly closed ring of vertices: the last vertex connects back to
/// the first.
///
/// A polygon is never mutated once it is attached to a shape; drawing again
/// produces a new shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<LatLng>,
}

impl Polygon {
    #[must_use]
    pub const fn new(vertices: Vec<LatLng>) -> Self {
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the polygon has enough vertices to enclose an area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_POLYGON_VERTICES
    }

    /// Iterates the edges of the ring, including the closing edge from the
    /// last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (LatLng, LatLng)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        Self::new(pairs.into_iter().map(LatLng::from).collect())
    }
}

impl FromIterator<LatLng> for Polygon {
    fn from_iter<T: IntoIterator<Item = LatLng>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Unique, never reused shape identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An axis-aligned latitude/longitude rectangle.
///
/// Always satisfies `lat_min <= lat_max` and `lon_min <= lon_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl Rectangle {
    /// Height in degrees of latitude.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Width in degrees of longitude.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Formats every bound with [`REPORTED_PRECISION`] fractional digits.
    #[must_use]
    pub fn to_reported(&self) -> ReportedRectangle {
        ReportedRectangle {
            lat_min: format_coordinate(self.lat_min),
            lon_min: format_coordinate(self.lon_min),
            lat_max: format_coordinate(self.lat_max),
            lon_max: format_coordinate(self.lon_max),
        }
    }
}

/// The external form of a [`Rectangle`]: fixed precision decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedRectangle {
    pub lat_min: String,
    pub lon_min: String,
    pub lat_max: String,
    pub lon_max: String,
}

impl fmt::Display for ReportedRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lat: {}-{}, Lon: {}-{}",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

/// Fractional digits needed to print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Formats a coordinate with [`REPORTED_PRECISION`] fractional digits.
///
/// Exact ties round away from zero (`0.0078125` → `0.007813`), unlike
/// `{:.6}` which rounds them to even. Negative zero is printed as
/// `0.000000`; other negative values keep their sign even when they round
/// to zero.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.prec$}", 0.0, prec = REPORTED_PRECISION);
    }

    let magnitude = round_half_away_from_zero(value.abs());
    if value < 0.0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Rounds a non-negative finite value to [`REPORTED_PRECISION`] digits
/// using its exact decimal expansion.
fn round_half_away_from_zero(magnitude: f64) -> String {
    let exact = format!("{magnitude:.prec$}", prec = EXACT_FRACTION_DIGITS);
    let Some((int_part, fraction)) = exact.split_once('.') else {
        return exact;
    };
    let (kept, dropped) = fraction.split_at(REPORTED_PRECISION);

    let mut digits: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - REPORTED_PRECISION;
    let digits = String::from_utf8_lossy(&digits);
    format!("{}.{}", &digits[..split], &digits[split..])
}
