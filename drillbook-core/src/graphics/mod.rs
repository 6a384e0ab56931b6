mod color;

pub use color::Color;

use std::fmt::{self, Write};

/// Bezier control-point factor approximating a quarter circle.
const KAPPA: f64 = 0.552284749831;

/// Builder for a page content stream.
///
/// Each call appends PDF operators; [`GraphicsContext::finish`] hands the
/// accumulated bytes to the writer.
#[derive(Clone, Debug)]
pub struct GraphicsContext {
    operations: String,
    fill_color: Color,
    stroke_color: Color,
    line_width: f64,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
        }
    }

    fn op(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.operations.write_fmt(args);
        self.operations.push('\n');
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} m"));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} l"));
        self
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.op(format_args!(
            "{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x3:.2} {y3:.2} c"
        ));
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} {width:.2} {height:.2} re"));
        self
    }

    /// Adds a rounded rectangle path with its lower-left corner at `(x, y)`.
    ///
    /// The radius is clamped to half of the smaller side; a zero radius
    /// degrades to a plain rectangle.
    pub fn rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> &mut Self {
        let r = radius.min(width.min(height) / 2.0).max(0.0);
        if r <= 0.0 {
            return self.rect(x, y, width, height);
        }
        let c = r * KAPPA;

        self.move_to(x + r, y + height);
        self.line_to(x + width - r, y + height);
        self.curve_to(
            x + width - r + c,
            y + height,
            x + width,
            y + height - r + c,
            x + width,
            y + height - r,
        );
        self.line_to(x + width, y + r);
        self.curve_to(x + width, y + r - c, x + width - r + c, y, x + width - r, y);
        self.line_to(x + r, y);
        self.curve_to(x + r - c, y, x, y + r - c, x, y + r);
        self.line_to(x, y + height - r);
        self.curve_to(x, y + height - r + c, x + r - c, y + height, x + r, y + height);
        self.close_path()
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.operations.push_str("h\n");
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.apply_stroke_color();
        self.operations.push_str("S\n");
        self
    }

    pub fn fill(&mut self) -> &mut Self {
        self.apply_fill_color();
        self.operations.push_str("f\n");
        self
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.apply_fill_color();
        self.apply_stroke_color();
        self.operations.push_str("B\n");
        self
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.stroke_color = color;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.line_width = width;
        self.op(format_args!("{width:.2} w"));
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.operations.push_str("q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.operations.push_str("Q\n");
        self
    }

    /// Shows already-encoded text with its baseline starting at `(x, y)`.
    pub fn show_text(
        &mut self,
        font_resource: &str,
        size: f64,
        color: Color,
        x: f64,
        y: f64,
        encoded: &[u8],
    ) -> &mut Self {
        self.operations.push_str("BT\n");
        self.op(format_args!("{}", color.fill_operator()));
        self.op(format_args!("/{font_resource} {size:.2} Tf"));
        self.op(format_args!("{x:.2} {y:.2} Td"));

        self.operations.push('(');
        for &byte in encoded {
            match byte {
                b'(' => self.operations.push_str("\\("),
                b')' => self.operations.push_str("\\)"),
                b'\\' => self.operations.push_str("\\\\"),
                0x20..=0x7E => self.operations.push(byte as char),
                _ => {
                    let _ = write!(&mut self.operations, "\\{byte:03o}");
                }
            }
        }
        self.operations.push_str(") Tj\n");

        self.operations.push_str("ET\n");
        self
    }

    fn apply_stroke_color(&mut self) {
        let operator = self.stroke_color.stroke_operator();
        self.op(format_args!("{operator}"));
    }

    fn apply_fill_color(&mut self) {
        let operator = self.fill_color.fill_operator();
        self.op(format_args!("{operator}"));
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn operations(&self) -> &str {
        &self.operations
    }

    pub fn finish(self) -> Vec<u8> {
        self.operations.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_context_new() {
        let ctx = GraphicsContext::new();
        assert_eq!(ctx.fill_color(), Color::black());
        assert_eq!(ctx.stroke_color(), Color::black());
        assert_eq!(ctx.line_width(), 1.0);
        assert!(ctx.operations().is_empty());
    }

    #[test]
    fn test_path_operators() {
        let mut ctx = GraphicsContext::new();
        ctx.move_to(10.0, 20.0).line_to(30.0, 40.0);
        ctx.curve_to(10.0, 20.0, 30.0, 40.0, 50.0, 60.0);
        ctx.rect(10.0, 20.0, 100.0, 50.0);

        let ops = ctx.operations();
        assert!(ops.contains("10.00 20.00 m\n"));
        assert!(ops.contains("30.00 40.00 l\n"));
        assert!(ops.contains("10.00 20.00 30.00 40.00 50.00 60.00 c\n"));
        assert!(ops.contains("10.00 20.00 100.00 50.00 re\n"));
    }

    #[test]
    fn test_rounded_rect_uses_four_curves() {
        let mut ctx = GraphicsContext::new();
        ctx.rounded_rect(0.0, 0.0, 100.0, 50.0, 8.0);

        let ops = ctx.operations();
        assert!(ops.starts_with("8.00 50.00 m\n"));
        assert_eq!(ops.matches(" c\n").count(), 4);
        assert!(ops.ends_with("h\n"));
    }

    #[test]
    fn test_rounded_rect_radius_is_clamped() {
        let mut ctx = GraphicsContext::new();
        ctx.rounded_rect(0.0, 0.0, 100.0, 10.0, 40.0);
        // Radius limited to half the height.
        assert!(ctx.operations().starts_with("5.00 10.00 m\n"));
    }

    #[test]
    fn test_zero_radius_is_plain_rect() {
        let mut ctx = GraphicsContext::new();
        ctx.rounded_rect(1.0, 2.0, 3.0, 4.0, 0.0);
        assert_eq!(ctx.operations(), "1.00 2.00 3.00 4.00 re\n");
    }

    #[test]
    fn test_fill_stroke_applies_both_colors() {
        let mut ctx = GraphicsContext::new();
        ctx.set_fill_color(Color::gray(0.9))
            .set_stroke_color(Color::rgb(0.0, 0.0, 1.0))
            .rect(0.0, 0.0, 10.0, 10.0)
            .fill_stroke();

        let ops = ctx.operations();
        assert!(ops.contains("0.900 g\n"));
        assert!(ops.contains("0.000 0.000 1.000 RG\n"));
        assert!(ops.ends_with("B\n"));
    }

    #[test]
    fn test_show_text_escapes_delimiters() {
        let mut ctx = GraphicsContext::new();
        ctx.show_text("F1", 12.0, Color::black(), 50.0, 700.0, b"a(b)\\c\x95");

        let ops = ctx.operations();
        assert!(ops.starts_with("BT\n"));
        assert!(ops.contains("/F1 12.00 Tf\n"));
        assert!(ops.contains("50.00 700.00 Td\n"));
        assert!(ops.contains("(a\\(b\\)\\\\c\\225) Tj\n"));
        assert!(ops.ends_with("ET\n"));
    }

    #[test]
    fn test_set_line_width() {
        let mut ctx = GraphicsContext::new();
        ctx.set_line_width(2.5);
        assert_eq!(ctx.line_width(), 2.5);
        assert_eq!(ctx.operations(), "2.50 w\n");
    }
}
