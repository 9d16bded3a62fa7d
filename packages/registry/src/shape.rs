//! The shape aggregate: a drawn polygon plus its decomposition settings and
//! cached rectangles.

use std::num::NonZeroU32;

use map_drawer_decompose::decompose;
use map_drawer_shape_models::{Polygon, Rectangle, ShapeId};

/// A drawn polygon and its decomposition state.
///
/// `rectangles` is derived from `polygon` and `band_count` and is only
/// written by [`Shape::recompute`], so it can never go stale behind a
/// caller's back.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    name: String,
    polygon: Polygon,
    band_count: NonZeroU32,
    visible: bool,
    send_to_server: bool,
    rectangles: Vec<Rectangle>,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, name: String, polygon: Polygon, band_count: NonZeroU32) -> Self {
        let mut shape = Self {
            id,
            name,
            polygon,
            band_count,
            visible: true,
            send_to_server: false,
            rectangles: Vec::new(),
        };
        shape.recompute();
        shape
    }

    #[must_use]
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub const fn band_count(&self) -> NonZeroU32 {
        self.band_count
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn send_to_server(&self) -> bool {
        self.send_to_server
    }

    #[must_use]
    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    /// Shape list label, e.g. `Downtown (12)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.band_count)
    }

    pub(crate) fn set_band_count(&mut self, band_count: NonZeroU32) {
        self.band_count = band_count;
        self.recompute();
    }

    pub(crate) const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) const fn set_send_to_server(&mut self, send: bool) {
        self.send_to_server = send;
    }

    pub(crate) fn recompute(&mut self) {
        self.rectangles = decompose(&self.polygon, self.band_count);
    }
}
