//! Pagination engine.
//!
//! [`DocumentRenderer`] walks a [`Plan`](crate::Plan) top to bottom. Page
//! break decisions come from [`HeightEstimator`]; all writes go through the
//! explicit [`PageCursor`] render context, and boxes are drawn by
//! [`ContainerRenderer`].

mod container;
mod cursor;
mod estimate;
mod renderer;

pub use container::{BoxGeometry, ContainerRenderer, Placement};
pub use cursor::{BreakReason, PageCursor};
pub use estimate::HeightEstimator;
pub use renderer::DocumentRenderer;

pub(crate) use container::ContainerFrame;

/// Tolerance for comparing accumulated vertical positions.
pub(crate) const EPSILON: f64 = 1e-6;
