#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response bodies for the rectangle submission endpoint.
//!
//! These mirror the JSON contract of `POST /send_multiple_rectangles`.
//! Rectangle bounds travel as fixed-precision decimal strings.

use map_drawer_shape_models::{ReportedRectangle, ShapeId};
use serde::{Deserialize, Serialize};

/// Body of `POST /send_multiple_rectangles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRectanglesRequest {
    pub shapes: Vec<SubmittedShape>,
}

/// One shape in a submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedShape {
    pub id: ShapeId,
    pub name: String,
    pub rectangles: Vec<ReportedRectangle>,
}

/// Success body of `POST /send_multiple_rectangles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRectanglesResponse {
    /// Batch-level summary, if the endpoint sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<ShapeResult>,
}

impl SendRectanglesResponse {
    /// The endpoint's verdict for one shape.
    #[must_use]
    pub fn result_for(&self, id: ShapeId) -> Option<&ShapeResult> {
        self.results.iter().find(|r| r.shape_id == id)
    }
}

/// The endpoint's verdict for a single shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeResult {
    pub shape_id: ShapeId,
    pub status: ResultStatus,
    #[serde(default)]
    pub message: String,
}

/// Per-shape status reported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}
