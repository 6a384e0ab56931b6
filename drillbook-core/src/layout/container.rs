use super::{PageCursor, EPSILON};
use crate::graphics::Color;
use crate::page::{ContainerKind, OpenPage, PageElement};
use crate::style::StyleConfiguration;
use tracing::debug;

/// How a container was placed on the page it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The whole block fits and the box has its estimated height, less any
    /// closing padding cut off by the bottom margin.
    Fits,
    /// The box fills the rest of the page; content continues in a new
    /// full-height box on the next page.
    Overflows,
}

/// Lower-left corner and size of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A container whose content is still being written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ContainerFrame {
    pub kind: ContainerKind,
    /// Horizontal inset of the box from the content area
    pub indent: f64,
    pub radius: f64,
    pub fill: Color,
    /// Inner padding restored at the top of a continuation box
    pub padding: f64,
}

/// Draws the rounded background boxes behind units and exercises.
#[derive(Clone, Copy)]
pub struct ContainerRenderer<'a> {
    config: &'a StyleConfiguration,
}

impl<'a> ContainerRenderer<'a> {
    pub fn new(config: &'a StyleConfiguration) -> Self {
        Self { config }
    }

    /// Draws a filled rounded rectangle with the configured border.
    pub fn draw_box(
        &self,
        page: &mut OpenPage,
        kind: ContainerKind,
        geometry: BoxGeometry,
        corner_radius: f64,
        fill: Color,
        continuation: bool,
    ) {
        page.push(PageElement::Box {
            kind,
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            radius: corner_radius,
            fill,
            border: self.config.colors.border,
            border_width: self.config.border_width,
            continuation,
        });
    }

    /// Box geometry for a container of `kind` spanning `height` points
    /// downwards from `top`.
    pub fn geometry(&self, kind: ContainerKind, top: f64, height: f64) -> BoxGeometry {
        let indent = self.frame(kind).indent;
        BoxGeometry {
            x: self.config.margin + indent,
            y: top - height,
            width: self.config.column_width(indent),
            height,
        }
    }

    pub(crate) fn frame(&self, kind: ContainerKind) -> ContainerFrame {
        let config = self.config;
        match kind {
            ContainerKind::Unit => ContainerFrame {
                kind,
                indent: 0.0,
                radius: config.border_radius_unit,
                fill: config.colors.unit_fill,
                padding: config.spacing.unit_padding,
            },
            ContainerKind::Exercise => ContainerFrame {
                kind,
                indent: config.indentation.exercise_box,
                radius: config.border_radius_exercise,
                fill: config.colors.exercise_fill,
                padding: config.spacing.exercise_padding,
            },
        }
    }

    /// Opens a container for a block of `block_height` points at the cursor.
    ///
    /// The box is drawn before any of its content. A block counts as fitting
    /// when everything but its closing padding fits; the box is then clipped
    /// at the bottom margin. Otherwise the box fills the page down to the
    /// bottom margin and every page break until [`ContainerRenderer::end`]
    /// redraws it at full height.
    pub fn begin(
        &self,
        cursor: &mut PageCursor<'_>,
        kind: ContainerKind,
        block_height: f64,
    ) -> Placement {
        let frame = self.frame(kind);
        let top = cursor.y();
        let remaining = cursor.remaining();

        let (height, placement) = if block_height - frame.padding <= remaining + EPSILON {
            (block_height.min(remaining), Placement::Fits)
        } else {
            debug!(
                ?kind,
                block_height,
                remaining,
                page = cursor.page_number(),
                "container continues on next page"
            );
            (remaining, Placement::Overflows)
        };

        let geometry = self.geometry(kind, top, height);
        self.draw_box(cursor.page_mut(), kind, geometry, frame.radius, frame.fill, false);
        cursor.push_frame(frame);
        placement
    }

    pub fn end(&self, cursor: &mut PageCursor<'_>) {
        cursor.pop_frame();
    }

    /// Full content-area box carrying `frame` over onto a fresh page.
    pub(crate) fn draw_continuation(&self, page: &mut OpenPage, frame: &ContainerFrame) {
        let geometry = self.geometry(
            frame.kind,
            self.config.content_top(),
            self.config.content_height(),
        );
        self.draw_box(page, frame.kind, geometry, frame.radius, frame.fill, true);
    }
}
