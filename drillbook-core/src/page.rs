use crate::graphics::Color;
use crate::style::{StyleRole, TextStyle};
use tracing::debug;

/// Which node of the document tree a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Unit,
    Exercise,
}

/// One drawing instruction on a page.
///
/// Coordinates use the PDF convention: the origin is the lower-left corner
/// of the page and Y grows upwards.
#[derive(Debug, Clone, PartialEq)]
pub enum PageElement {
    /// A single line of text with its baseline at `y`.
    Text {
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
        role: StyleRole,
    },
    /// A filled, bordered rounded rectangle with its lower-left corner at
    /// `(x, y)`.
    Box {
        kind: ContainerKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        fill: Color,
        border: Color,
        border_width: f64,
        /// Set on boxes that carry a container over from the previous page
        continuation: bool,
    },
    /// A horizontal line.
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
        color: Color,
        width: f64,
    },
}

impl PageElement {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PageElement::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, PageElement::Box { .. })
    }

    /// Top edge of the element.
    pub fn top(&self) -> f64 {
        match self {
            PageElement::Text { y, style, .. } => y + style.size,
            PageElement::Box { y, height, .. } => y + height,
            PageElement::Rule { y, .. } => *y,
        }
    }
}

/// The page currently accepting writes.
///
/// Closing consumes the page, so a closed [`Page`] can never be written to
/// again.
#[derive(Debug)]
pub struct OpenPage {
    number: usize,
    width: f64,
    height: f64,
    elements: Vec<PageElement>,
}

impl OpenPage {
    pub(crate) fn new(number: usize, width: f64, height: f64) -> Self {
        debug!(page = number, "opening page");
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn elements(&self) -> &[PageElement] {
        &self.elements
    }

    pub(crate) fn push(&mut self, element: PageElement) {
        self.elements.push(element);
    }

    /// Draws the footer (if any) and freezes the page.
    pub(crate) fn close(mut self, footer: Option<PageElement>) -> Page {
        if let Some(footer) = footer {
            self.elements.push(footer);
        }
        debug!(
            page = self.number,
            elements = self.elements.len(),
            "closing page"
        );
        Page {
            number: self.number,
            width: self.width,
            height: self.height,
            elements: self.elements,
        }
    }
}

/// A finished page: fixed size and an ordered display list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    number: usize,
    width: f64,
    height: f64,
    elements: Vec<PageElement>,
}

impl Page {
    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn elements(&self) -> &[PageElement] {
        &self.elements
    }

    /// Text lines in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(PageElement::as_text)
    }

    /// Text lines drawn in `role`.
    pub fn texts_with_role(&self, role: StyleRole) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(move |element| match element {
            PageElement::Text { text, role: r, .. } if *r == role => Some(text.as_str()),
            _ => None,
        })
    }

    /// Boxes of `kind` in drawing order.
    pub fn boxes(&self, kind: ContainerKind) -> impl Iterator<Item = &PageElement> {
        self.elements.iter().filter(move |element| {
            matches!(element, PageElement::Box { kind: k, .. } if *k == kind)
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Expands `{{page_number}}` and `{{plan_name}}` in a footer template.
pub fn render_footer(template: &str, page_number: usize, plan_name: &str) -> String {
    template
        .replace("{{page_number}}", &page_number.to_string())
        .replace("{{plan_name}}", plan_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str, role: StyleRole) -> PageElement {
        PageElement::Text {
            text: value.to_string(),
            x: 50.0,
            y: 700.0,
            style: TextStyle::regular(10.0),
            role,
        }
    }

    #[test]
    fn test_close_appends_footer_last() {
        let mut page = OpenPage::new(1, 595.0, 842.0);
        page.push(text("Week 1", StyleRole::Title));
        let page = page.close(Some(text("Page 1", StyleRole::Footer)));

        assert_eq!(page.number(), 1);
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["Week 1", "Page 1"]);
        assert_eq!(
            page.texts_with_role(StyleRole::Footer).collect::<Vec<_>>(),
            vec!["Page 1"]
        );
    }

    #[test]
    fn test_close_without_footer() {
        let page = OpenPage::new(3, 100.0, 200.0).close(None);
        assert!(page.elements().is_empty());
        assert_eq!((page.width(), page.height()), (100.0, 200.0));
    }

    #[test]
    fn test_boxes_filters_by_kind() {
        let mut page = OpenPage::new(1, 595.0, 842.0);
        for kind in [ContainerKind::Unit, ContainerKind::Exercise, ContainerKind::Exercise] {
            page.push(PageElement::Box {
                kind,
                x: 50.0,
                y: 100.0,
                width: 495.0,
                height: 40.0,
                radius: 5.0,
                fill: Color::white(),
                border: Color::black(),
                border_width: 1.0,
                continuation: false,
            });
        }
        let page = page.close(None);
        assert_eq!(page.boxes(ContainerKind::Unit).count(), 1);
        assert_eq!(page.boxes(ContainerKind::Exercise).count(), 2);
        assert_eq!(page.elements()[0].top(), 140.0);
    }

    #[test]
    fn test_render_footer() {
        assert_eq!(render_footer("Page {{page_number}}", 4, "Week 1"), "Page 4");
        assert_eq!(
            render_footer("{{plan_name}} - {{page_number}}", 2, "Week 1"),
            "Week 1 - 2"
        );
        assert_eq!(render_footer("static", 9, "x"), "static");
    }
}
