//! # drillbook
//!
//! Pagination and layout engine that turns a training plan (a plan made of
//! units, each made of exercises) into a paginated PDF document.
//!
//! ## Features
//!
//! - **Greedy text wrapping** driven by a pluggable [`TextMetrics`] provider
//! - **Height estimation** that matches rendering exactly, used for every
//!   page-break decision
//! - **Orphan avoidance**: a unit header is never left alone at the bottom of
//!   a page without its first exercise
//! - **Box continuation**: unit and exercise boxes that overflow a page are
//!   continued by full-height boxes on the following pages
//! - **Deterministic output**: the same plan and style always produce the
//!   same bytes
//! - **Atomic export**: files are written to a temporary file and renamed
//!   into place only on success
//!
//! ## Quick Start
//!
//! ```rust
//! use drillbook::{layout, Exercise, Plan, StyleConfiguration, Unit, Weekday};
//!
//! # fn main() -> drillbook::Result<()> {
//! let plan = Plan::new("Week 1").with_unit(
//!     Unit::new("Leg Day", Weekday::Monday).with_exercise(
//!         Exercise::new("Squats").with_duration("10 min").with_sets(3),
//!     ),
//! );
//!
//! let document = layout(&plan, &StyleConfiguration::default())?;
//! assert_eq!(document.page_count(), 1);
//! assert!(document.pages()[0].contains_text("Leg Day (MONDAY)"));
//!
//! let bytes = document.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Exporting to a file
//!
//! ```rust,no_run
//! use drillbook::{render, Plan, StyleConfiguration};
//!
//! # fn main() -> drillbook::Result<()> {
//! let summary = render(&Plan::new("Week 1"), &StyleConfiguration::default(), "week1.pdf")?;
//! println!("{} pages, {} bytes", summary.page_count, summary.bytes_written);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod graphics;
pub mod layout;
pub mod model;
pub mod objects;
pub mod page;
pub mod style;
pub mod text;
pub mod writer;

pub use document::{DocumentMetadata, ExportSummary, RenderedDocument};
pub use error::{ExportError, Result};
pub use graphics::{Color, GraphicsContext};
pub use layout::{
    BreakReason, ContainerRenderer, DocumentRenderer, HeightEstimator, PageCursor, Placement,
};
pub use model::{Exercise, Plan, Unit, Weekday};
pub use page::{ContainerKind, Page, PageElement};
pub use style::{BoxColors, Indentation, Spacing, StyleConfiguration, StyleRole, TextStyle};
pub use text::{FontFamily, StandardMetrics, TextMetrics, TextWrapper, WrapOutcome};

use std::path::Path;
use tracing::{debug, info_span};

/// Current version of drillbook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays `plan` out on pages using the standard font metrics.
///
/// # Errors
///
/// Returns a configuration error when `style` fails validation.
pub fn layout(plan: &Plan, style: &StyleConfiguration) -> Result<RenderedDocument> {
    layout_with_metrics(plan, style, &StandardMetrics::new())
}

/// Lays `plan` out on pages, measuring text with `metrics`.
pub fn layout_with_metrics(
    plan: &Plan,
    style: &StyleConfiguration,
    metrics: &dyn TextMetrics,
) -> Result<RenderedDocument> {
    let renderer = DocumentRenderer::new(style, metrics)?;
    let pages = renderer.render(plan);
    debug!(
        plan = plan.display_name(),
        units = plan.units.len(),
        exercises = plan.exercise_count(),
        pages = pages.len(),
        "layout finished"
    );
    Ok(RenderedDocument::new(
        pages,
        DocumentMetadata::for_plan(plan.display_name()),
    ))
}

/// Lays `plan` out and writes the PDF to `destination`.
///
/// # Errors
///
/// Configuration errors are returned before anything touches the file
/// system. Export failures leave `destination` as it was.
pub fn render(
    plan: &Plan,
    style: &StyleConfiguration,
    destination: impl AsRef<Path>,
) -> Result<ExportSummary> {
    let span = info_span!("render", plan = plan.display_name());
    let _guard = span.enter();

    layout(plan, style)?.save(destination)
}
