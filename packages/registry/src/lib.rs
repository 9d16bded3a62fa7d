#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory registry of drawn shapes.
//!
//! The registry owns every [`Shape`], allocates their ids, tracks which one
//! is active, and keeps each shape's cached rectangles in step with its
//! polygon and band count. Presentation and transport adapters read from it
//! and drive it through the methods on [`ShapeRegistry`]; nothing else
//! mutates a shape.
//!
//! All operations are synchronous. A batch submission works on the owned
//! snapshot returned by [`ShapeRegistry::prepare_batch`], so the registry
//! stays usable while a request is in flight.

pub mod feedback;
pub mod shape;

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use map_drawer_shape_models::{Polygon, Rectangle, ReportedRectangle, ShapeId};
use thiserror::Error;

pub use feedback::{Feedback, FeedbackTone};
pub use shape::Shape;

/// Band count used for new shapes when the caller has no preference.
pub const DEFAULT_BAND_COUNT: u32 = 10;

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Band counts must be at least 1.
    #[error("Invalid band count {0}: must be at least 1")]
    InvalidBandCount(u32),

    /// No shape with this id exists.
    #[error("Unknown shape {0}")]
    UnknownShape(ShapeId),
}

/// A shape's decomposition as handed to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSubmission {
    pub id: ShapeId,
    pub name: String,
    pub rectangles: Vec<Rectangle>,
}

impl ShapeSubmission {
    #[must_use]
    pub fn reported_rectangles(&self) -> Vec<ReportedRectangle> {
        self.rectangles.iter().map(Rectangle::to_reported).collect()
    }
}

/// Owner of all shapes for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    next_id: u64,
    active: Option<ShapeId>,
    feedback: BTreeMap<ShapeId, Feedback>,
}

fn validate_band_count(band_count: u32) -> Result<NonZeroU32, RegistryError> {
    NonZeroU32::new(band_count).ok_or(RegistryError::InvalidBandCount(band_count))
}

impl ShapeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly drawn polygon and makes it the active shape.
    ///
    /// A blank `name` is replaced with `Shape N`. Polygons with fewer than
    /// three vertices are accepted and simply decompose to nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidBandCount`] if `band_count` is 0. No
    /// shape is created in that case.
    pub fn create_shape(
        &mut self,
        polygon: Polygon,
        name: Option<&str>,
        band_count: u32,
    ) -> Result<ShapeId, RegistryError> {
        let band_count = validate_band_count(band_count)?;

        self.next_id += 1;
        let id = ShapeId(self.next_id);

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| format!("Shape {}", self.shapes.len() + 1), str::to_string);

        if !polygon.is_valid() {
            log::warn!(
                "Shape '{name}' has only {} vertices; it will have no rectangles",
                polygon.len()
            );
        }

        let shape = Shape::new(id, name, polygon, band_count);
        log::info!(
            "Created shape {id} '{}' with {} rectangles",
            shape.name(),
            shape.rectangles().len()
        );
        self.shapes.push(shape);

        self.activate(id)?;

        Ok(id)
    }

    /// Changes a shape's band count and recomputes its rectangles.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidBandCount`] for 0 or
    /// [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn set_band_count(&mut self, id: ShapeId, band_count: u32) -> Result<(), RegistryError> {
        let band_count = validate_band_count(band_count)?;
        let shape = self.shape_mut(id)?;
        shape.set_band_count(band_count);
        log::debug!(
            "Shape {id} now has {band_count} bands ({} rectangles)",
            shape.rectangles().len()
        );
        Ok(())
    }

    /// Shows or hides a shape. Its rectangles are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn set_visible(&mut self, id: ShapeId, visible: bool) -> Result<(), RegistryError> {
        self.shape_mut(id)?.set_visible(visible);
        log::debug!("Shape {id} visible: {visible}");
        Ok(())
    }

    /// Flips a shape's visibility and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn toggle_visible(&mut self, id: ShapeId) -> Result<bool, RegistryError> {
        let visible = !self.get(id)?.is_visible();
        self.set_visible(id, visible)?;
        Ok(visible)
    }

    /// Marks a shape for inclusion in (or exclusion from) the next batch.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn set_send_to_server(&mut self, id: ShapeId, send: bool) -> Result<(), RegistryError> {
        let shape = self.shape_mut(id)?;
        shape.set_send_to_server(send);
        log::info!("Shape '{}' send to server set to: {send}", shape.name());
        Ok(())
    }

    /// Flips a shape's send flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn toggle_send_to_server(&mut self, id: ShapeId) -> Result<bool, RegistryError> {
        let send = !self.get(id)?.send_to_server();
        self.set_send_to_server(id, send)?;
        Ok(send)
    }

    /// Makes `id` the active shape.
    ///
    /// Activating a hidden shape shows it again. Any feedback left on the
    /// shape from an earlier batch is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered;
    /// the previous active shape is kept in that case.
    pub fn activate(&mut self, id: ShapeId) -> Result<(), RegistryError> {
        let shape = self.shape_mut(id)?;
        if !shape.is_visible() {
            log::debug!("Showing hidden shape {id} on activation");
            shape.set_visible(true);
        }
        self.active = Some(id);
        self.feedback.remove(&id);
        Ok(())
    }

    /// Id of the active shape, if any.
    #[must_use]
    pub const fn active_id(&self) -> Option<ShapeId> {
        self.active
    }

    /// The active shape, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Shape> {
        self.active.and_then(|id| self.get(id).ok())
    }

    /// Looks up a shape by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn get(&self, id: ShapeId) -> Result<&Shape, RegistryError> {
        self.shapes
            .iter()
            .find(|s| s.id() == id)
            .ok_or(RegistryError::UnknownShape(id))
    }

    /// All shapes in creation order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Recomputes every shape and returns the ones flagged for sending, in
    /// creation order.
    ///
    /// An empty result means nothing is flagged; it is not a failure.
    pub fn collect_for_submission(&mut self) -> Vec<ShapeSubmission> {
        for shape in &mut self.shapes {
            shape.recompute();
        }

        self.shapes
            .iter()
            .filter(|s| s.send_to_server())
            .map(|s| ShapeSubmission {
                id: s.id(),
                name: s.name().to_string(),
                rectangles: s.rectangles().to_vec(),
            })
            .collect()
    }

    /// Runs the "process" command: collects the submission snapshot, marks
    /// each flagged shape as pending and every other shape as skipped.
    pub fn prepare_batch(&mut self) -> Vec<ShapeSubmission> {
        let batch = self.collect_for_submission();

        for shape in &self.shapes {
            let feedback = if shape.send_to_server() {
                Feedback::pending()
            } else {
                Feedback::skipped()
            };
            self.feedback.insert(shape.id(), feedback);
        }

        log::info!(
            "Prepared batch of {} of {} shapes",
            batch.len(),
            self.shapes.len()
        );

        batch
    }

    /// Current feedback for a shape, if any.
    #[must_use]
    pub fn feedback(&self, id: ShapeId) -> Option<&Feedback> {
        self.feedback.get(&id)
    }

    /// Replaces one shape's feedback.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownShape`] if `id` is not registered.
    pub fn set_feedback(&mut self, id: ShapeId, feedback: Feedback) -> Result<(), RegistryError> {
        self.get(id)?;
        self.feedback.insert(id, feedback);
        Ok(())
    }

    /// Applies a batch's per-shape outcomes. Only the listed shapes are
    /// touched; ids that are not registered are logged and skipped.
    pub fn apply_feedback(&mut self, updates: impl IntoIterator<Item = (ShapeId, Feedback)>) {
        for (id, feedback) in updates {
            if let Err(e) = self.set_feedback(id, feedback) {
                log::warn!("Dropping feedback: {e}");
            }
        }
    }

    fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape, RegistryError> {
        self.shapes
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(RegistryError::UnknownShape(id))
    }
}
