use super::{ContainerFrame, ContainerRenderer, EPSILON};
use crate::page::{render_footer, OpenPage, Page, PageElement};
use crate::style::{StyleConfiguration, StyleRole, TextStyle};
use crate::text::{TextMetrics, TextWrapper};
use std::fmt;
use tracing::{debug, warn};

/// Why the cursor moved on to a new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakReason {
    /// Spacing ran past the bottom margin
    Spacing,
    /// A line did not fit in the remaining room
    LineOverflow,
    /// The separator rule and its gaps did not fit
    Separator,
    /// A unit header would have been left without its first exercise
    OrphanAvoidance,
    /// Too little room left to start an exercise box
    ExerciseStart,
}

impl fmt::Display for BreakReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            BreakReason::Spacing => "spacing",
            BreakReason::LineOverflow => "line overflow",
            BreakReason::Separator => "separator",
            BreakReason::OrphanAvoidance => "orphan avoidance",
            BreakReason::ExerciseStart => "exercise start",
        };
        f.write_str(reason)
    }
}

/// The render context: the open page, the pages already closed, the write
/// position and the containers still open.
///
/// Only one page is ever open. The first one is created lazily on the first
/// write; a page break closes it (drawing its footer) and opens the next,
/// redrawing every open container as a full-height box.
pub struct PageCursor<'a> {
    config: &'a StyleConfiguration,
    metrics: &'a dyn TextMetrics,
    plan_name: String,
    page: Option<OpenPage>,
    closed: Vec<Page>,
    y: f64,
    /// True until something is placed on the current page
    fresh: bool,
    frames: Vec<ContainerFrame>,
}

impl<'a> PageCursor<'a> {
    pub fn new(
        config: &'a StyleConfiguration,
        metrics: &'a dyn TextMetrics,
        plan_name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            metrics,
            plan_name: plan_name.into(),
            page: None,
            closed: Vec::new(),
            y: config.content_top(),
            fresh: true,
            frames: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a StyleConfiguration {
        self.config
    }

    pub fn metrics(&self) -> &'a dyn TextMetrics {
        self.metrics
    }

    /// Current write position (top of the next line).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Room left above the bottom margin.
    pub fn remaining(&self) -> f64 {
        self.y - self.config.margin
    }

    pub fn fits(&self, amount: f64) -> bool {
        self.y - amount >= self.config.margin - EPSILON
    }

    /// Whether nothing has been placed on the current page yet.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Number of the open page, or of the page the next write will open.
    pub fn page_number(&self) -> usize {
        self.closed.len() + 1
    }

    pub(crate) fn page_mut(&mut self) -> &mut OpenPage {
        let number = self.closed.len() + 1;
        let (width, height) = (self.config.page_width, self.config.page_height);
        self.page
            .get_or_insert_with(|| OpenPage::new(number, width, height))
    }

    pub(crate) fn push_frame(&mut self, frame: ContainerFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Closes the open page and opens the next one.
    ///
    /// Open containers are redrawn outermost first so nested boxes stack
    /// correctly, and the cursor resumes below the innermost box's padding.
    pub fn break_page(&mut self, reason: BreakReason) {
        debug!(page = self.page_number(), %reason, "page break");
        self.close_current();

        let mut page = OpenPage::new(
            self.closed.len() + 1,
            self.config.page_width,
            self.config.page_height,
        );
        let containers = ContainerRenderer::new(self.config);
        for frame in &self.frames {
            containers.draw_continuation(&mut page, frame);
        }
        self.page = Some(page);

        let inset = self.frames.last().map_or(0.0, |frame| frame.padding);
        self.y = self.config.content_top() - inset;
        self.fresh = true;
    }

    /// Breaks unless `amount` still fits. A fresh page never breaks, so
    /// content taller than a page cannot produce a run of empty pages.
    pub fn ensure_room(&mut self, amount: f64, reason: BreakReason) {
        self.page_mut();
        if !self.fits(amount) && !self.fresh {
            self.break_page(reason);
        }
    }

    /// Moves down by `amount`. Spacing that would cross the bottom margin is
    /// dropped and a new page started instead.
    pub fn add_spacing(&mut self, amount: f64) {
        self.page_mut();
        if self.fits(amount) {
            self.y -= amount;
            if amount > 0.0 {
                self.fresh = false;
            }
        } else if self.fresh {
            self.y = self.config.margin;
            self.fresh = false;
        } else {
            self.break_page(BreakReason::Spacing);
        }
    }

    /// Moves down by at most `amount`, stopping at the bottom margin. Used
    /// for the closing padding of a box, which must never open a new page.
    pub fn add_trailing_spacing(&mut self, amount: f64) {
        self.page_mut();
        let consumed = amount.min(self.remaining()).max(0.0);
        self.y -= consumed;
        if consumed > 0.0 {
            self.fresh = false;
        }
    }

    /// Writes a single line, truncating it to the column width.
    pub fn write_line(
        &mut self,
        text: &str,
        indent: f64,
        style: &TextStyle,
        role: StyleRole,
        extra_leading: f64,
    ) {
        let line_height = style.size * self.config.base_line_spacing_factor + extra_leading;
        self.ensure_room(line_height, BreakReason::LineOverflow);

        let available = self.config.column_width(indent);
        let text = if self.metrics.measure_width(text, style) > available {
            let truncated = TextWrapper::new(self.metrics).truncate(text, style, available);
            warn!(
                available,
                original = text.chars().count(),
                kept = truncated.chars().count(),
                "line truncated to column width"
            );
            truncated
        } else {
            text.to_string()
        };

        let element = PageElement::Text {
            text,
            x: self.config.margin + indent,
            y: self.y - style.size,
            style: *style,
            role,
        };
        self.page_mut().push(element);
        self.y -= line_height;
        self.fresh = false;
    }

    /// Wraps `text` to the column width and writes every line. Blank lines
    /// only advance the cursor. Returns the number of lines.
    pub fn write_wrapped(
        &mut self,
        text: &str,
        indent: f64,
        style: &TextStyle,
        role: StyleRole,
    ) -> usize {
        let width = self.config.column_width(indent);
        let lines = TextWrapper::new(self.metrics).wrap(text, style, width);
        let extra = self.config.extra_leading(lines.len());

        for line in &lines {
            if line.is_empty() {
                self.advance_line(style, extra);
            } else {
                self.write_line(line, indent, style, role, extra);
            }
        }
        lines.len()
    }

    fn advance_line(&mut self, style: &TextStyle, extra_leading: f64) {
        let line_height = style.size * self.config.base_line_spacing_factor + extra_leading;
        self.ensure_room(line_height, BreakReason::LineOverflow);
        self.y -= line_height;
        self.fresh = false;
    }

    /// Draws a full-width rule centred in `2 * gap` of vertical space.
    pub fn draw_separator(&mut self, gap: f64) {
        self.ensure_room(2.0 * gap, BreakReason::Separator);
        let element = PageElement::Rule {
            x1: self.config.margin,
            x2: self.config.page_width - self.config.margin,
            y: self.y - gap,
            color: self.config.colors.separator,
            width: self.config.border_width,
        };
        self.page_mut().push(element);
        self.y -= 2.0 * gap;
        self.fresh = false;
    }

    fn footer(&self, page_number: usize) -> Option<PageElement> {
        if self.config.footer_template.trim().is_empty() {
            return None;
        }
        let style = self.config.footer_style;
        let text = render_footer(&self.config.footer_template, page_number, &self.plan_name);
        let width = self.metrics.measure_width(&text, &style);
        Some(PageElement::Text {
            x: ((self.config.page_width - width) / 2.0).max(0.0),
            y: self.config.margin / 2.0,
            text,
            style,
            role: StyleRole::Footer,
        })
    }

    fn close_current(&mut self) {
        if let Some(page) = self.page.take() {
            let footer = self.footer(page.number());
            self.closed.push(page.close(footer));
        }
    }

    /// Closes the last page and hands over every page in order.
    pub fn finish(mut self) -> Vec<Page> {
        if self.page.is_none() && self.closed.is_empty() {
            self.page_mut();
        }
        self.close_current();
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ContainerKind;
    use crate::text::StandardMetrics;

    fn config() -> StyleConfiguration {
        StyleConfiguration::default()
    }

    #[test]
    fn test_first_page_is_lazy() {
        let config = config();
        let metrics = StandardMetrics::new();
        let cursor = PageCursor::new(&config, &metrics, "Plan");
        assert!(cursor.page.is_none());
        assert_eq!(cursor.y(), 792.0);
        assert_eq!(cursor.remaining(), 742.0);

        // Finishing without writes still yields one page.
        let pages = cursor.finish();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_add_spacing_moves_cursor() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        cursor.add_spacing(100.0);
        assert_eq!(cursor.y(), 692.0);
        assert!(!cursor.is_fresh());
    }

    #[test]
    fn test_add_spacing_breaks_and_drops_amount() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        cursor.add_spacing(700.0);
        cursor.add_spacing(50.0);

        assert_eq!(cursor.page_number(), 2);
        assert_eq!(cursor.y(), 792.0);
        assert!(cursor.is_fresh());
    }

    #[test]
    fn test_trailing_spacing_stops_at_margin() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        cursor.add_spacing(738.0);
        cursor.add_trailing_spacing(10.0);

        assert_eq!(cursor.page_number(), 1);
        assert_eq!(cursor.y(), 50.0);
        assert_eq!(cursor.remaining(), 0.0);

        cursor.add_trailing_spacing(10.0);
        assert_eq!(cursor.y(), 50.0);
        assert_eq!(cursor.finish().len(), 1);
    }

    #[test]
    fn test_write_line_advances_by_leading() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        let style = TextStyle::regular(10.0);

        cursor.write_line("Squats", 10.0, &style, StyleRole::ExerciseName, 0.0);
        assert_eq!(cursor.y(), 780.0);
        cursor.write_line("Lunges", 10.0, &style, StyleRole::ExerciseName, 2.0);
        assert_eq!(cursor.y(), 766.0);

        let pages = cursor.finish();
        match &pages[0].elements()[0] {
            PageElement::Text { text, x, y, .. } => {
                assert_eq!(text, "Squats");
                assert_eq!(*x, 60.0);
                assert_eq!(*y, 782.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_write_line_truncates_instead_of_wrapping() {
        let config = config().with_page_size(200.0, 300.0);
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        let style = TextStyle::regular(10.0);
        let long = "a very long line that can never fit into a hundred points";

        cursor.write_line(long, 0.0, &style, StyleRole::Description, 0.0);
        let pages = cursor.finish();
        let text = pages[0].texts().next().unwrap().to_string();

        assert!(long.starts_with(&text));
        assert!(text.len() < long.len());
        assert!(metrics.measure_width(&text, &style) <= 100.0);
    }

    #[test]
    fn test_write_line_breaks_when_leading_does_not_fit() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        let style = TextStyle::regular(10.0);

        cursor.add_spacing(735.0);
        cursor.write_line("next page", 0.0, &style, StyleRole::Description, 0.0);

        assert_eq!(cursor.page_number(), 2);
        let pages = cursor.finish();
        assert!(pages[1].contains_text("next page"));
        assert!(!pages[0].contains_text("next page"));
    }

    #[test]
    fn test_write_wrapped_blank_lines_only_advance() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        let style = TextStyle::regular(10.0);

        let lines = cursor.write_wrapped("first\n\nthird", 0.0, &style, StyleRole::Description);
        assert_eq!(lines, 3);
        // Three lines at 10 * 1.2 + 2 each.
        assert!((cursor.y() - (792.0 - 42.0)).abs() < 1e-9);

        let pages = cursor.finish();
        assert_eq!(
            pages[0].texts_with_role(StyleRole::Description).collect::<Vec<_>>(),
            vec!["first", "third"]
        );
    }

    #[test]
    fn test_footer_drawn_once_per_page() {
        let config = config().with_footer_template("{{plan_name}} / {{page_number}}");
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Week 1");
        cursor.add_spacing(10.0);
        cursor.break_page(BreakReason::Spacing);
        cursor.add_spacing(10.0);

        let pages = cursor.finish();
        assert_eq!(pages.len(), 2);
        for (index, page) in pages.iter().enumerate() {
            let footers: Vec<_> = page.texts_with_role(StyleRole::Footer).collect();
            assert_eq!(footers, vec![format!("Week 1 / {}", index + 1)]);
        }
    }

    #[test]
    fn test_empty_footer_template_draws_nothing() {
        let config = config().with_footer_template("");
        let metrics = StandardMetrics::new();
        let pages = PageCursor::new(&config, &metrics, "Plan").finish();
        assert_eq!(pages[0].texts().count(), 0);
    }

    #[test]
    fn test_break_redraws_open_containers() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        let containers = ContainerRenderer::new(&config);

        containers.begin(&mut cursor, ContainerKind::Unit, 2000.0);
        containers.begin(&mut cursor, ContainerKind::Exercise, 2000.0);
        cursor.break_page(BreakReason::LineOverflow);

        // Resumes below the exercise padding.
        assert_eq!(cursor.y(), 792.0 - config.spacing.exercise_padding);
        containers.end(&mut cursor);
        containers.end(&mut cursor);

        let pages = cursor.finish();
        let kinds: Vec<_> = pages[1]
            .elements()
            .iter()
            .filter_map(|element| match element {
                PageElement::Box { kind, continuation, .. } => Some((*kind, *continuation)),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![(ContainerKind::Unit, true), (ContainerKind::Exercise, true)]
        );
    }

    #[test]
    fn test_separator_consumes_twice_the_gap() {
        let config = config();
        let metrics = StandardMetrics::new();
        let mut cursor = PageCursor::new(&config, &metrics, "Plan");
        cursor.draw_separator(12.0);
        assert_eq!(cursor.y(), 768.0);

        let pages = cursor.finish();
        assert!(matches!(
            pages[0].elements()[0],
            PageElement::Rule { y, x1, x2, .. } if y == 780.0 && x1 == 50.0 && x2 == 545.0
        ));
    }
}
