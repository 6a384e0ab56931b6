//! Greedy paragraph wrapping.
//!
//! Text is split on explicit line breaks into paragraphs; each paragraph is
//! filled greedily, breaking at the last whitespace that fits and falling
//! back to a hard break inside a word when no whitespace is available. Every
//! iteration consumes at least one character, so wrapping always terminates
//! even when a single glyph is wider than the column.

use crate::style::TextStyle;
use crate::text::TextMetrics;
use tracing::{trace, warn};

/// Lines produced by [`TextWrapper::wrap_detailed`] plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrapOutcome {
    pub lines: Vec<String>,
    /// Breaks placed inside a word because no whitespace fit
    pub forced_breaks: usize,
    /// Lines holding a single glyph wider than the column
    pub oversized_glyphs: usize,
}

impl WrapOutcome {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Breaks paragraphs into lines that fit a maximum width.
#[derive(Clone, Copy)]
pub struct TextWrapper<'m> {
    metrics: &'m dyn TextMetrics,
}

impl<'m> TextWrapper<'m> {
    pub fn new(metrics: &'m dyn TextMetrics) -> Self {
        Self { metrics }
    }

    pub fn wrap(&self, text: &str, style: &TextStyle, max_width: f64) -> Vec<String> {
        self.wrap_detailed(text, style, max_width).lines
    }

    pub fn wrap_detailed(&self, text: &str, style: &TextStyle, max_width: f64) -> WrapOutcome {
        let normalized = normalize_line_endings(text);
        let mut outcome = WrapOutcome::default();

        for paragraph in normalized.split('\n') {
            if paragraph.is_empty() {
                outcome.lines.push(String::new());
                continue;
            }
            self.wrap_paragraph(paragraph, style, max_width, &mut outcome);
        }

        if outcome.oversized_glyphs > 0 {
            warn!(
                max_width,
                glyphs = outcome.oversized_glyphs,
                "glyph wider than the available width; emitting it on its own line"
            );
        }
        trace!(
            lines = outcome.lines.len(),
            forced = outcome.forced_breaks,
            max_width,
            "wrapped text"
        );

        outcome
    }

    fn wrap_paragraph(
        &self,
        paragraph: &str,
        style: &TextStyle,
        max_width: f64,
        outcome: &mut WrapOutcome,
    ) {
        let chars: Vec<char> = paragraph.chars().collect();
        let len = chars.len();
        let mut start = 0;
        let mut emitted = false;

        while start < len {
            let mut end = start;
            let mut width = 0.0;
            let mut last_space: Option<usize> = None;

            while end < len {
                let next = width + self.metrics.glyph_width(chars[end], style);
                if next > max_width {
                    break;
                }
                width = next;
                if chars[end].is_whitespace() && end > start {
                    last_space = Some(end);
                }
                end += 1;
            }

            if end == len {
                outcome.lines.push(collect_trimmed(&chars[start..end]));
                emitted = true;
                break;
            }

            if end == start {
                // A lone glyph wider than the column still has to go somewhere.
                outcome.oversized_glyphs += 1;
                outcome.lines.push(chars[start].to_string());
                emitted = true;
                start += 1;
            } else if chars[end].is_whitespace() {
                outcome.lines.push(collect_trimmed(&chars[start..end]));
                emitted = true;
                start = end + 1;
            } else if let Some(space) = last_space {
                outcome.lines.push(collect_trimmed(&chars[start..space]));
                emitted = true;
                start = space + 1;
            } else {
                outcome.forced_breaks += 1;
                outcome.lines.push(chars[start..end].iter().collect());
                emitted = true;
                start = end;
            }

            while start < len && chars[start].is_whitespace() {
                start += 1;
            }
        }

        if !emitted {
            outcome.lines.push(String::new());
        }
    }

    /// Cuts a single line down to the widest prefix that fits.
    pub fn truncate(&self, text: &str, style: &TextStyle, max_width: f64) -> String {
        let mut width = 0.0;
        let mut result = String::new();
        for ch in text.chars() {
            let next = width + self.metrics.glyph_width(ch, style);
            if next > max_width {
                break;
            }
            width = next;
            result.push(ch);
        }
        result
    }
}

/// Converts `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn collect_trimmed(chars: &[char]) -> String {
    let line: String = chars.iter().collect();
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StandardMetrics;

    /// Every glyph is exactly 10 points wide.
    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn glyph_width(&self, _ch: char, _style: &TextStyle) -> f64 {
            10.0
        }
    }

    fn style() -> TextStyle {
        TextStyle::regular(10.0)
    }

    #[test]
    fn test_short_text_is_one_line() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        assert_eq!(wrapper.wrap("abc", &style(), 100.0), vec!["abc"]);
    }

    #[test]
    fn test_breaks_at_last_whitespace() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        // 8 glyphs per line at most
        let lines = wrapper.wrap("one two three four", &style(), 80.0);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_break_exactly_at_whitespace() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let lines = wrapper.wrap("abcd efgh", &style(), 40.0);
        assert_eq!(lines, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_forced_break_inside_long_word() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let outcome = wrapper.wrap_detailed("abcdefghij", &style(), 40.0);
        assert_eq!(outcome.lines, vec!["abcd", "efgh", "ij"]);
        assert_eq!(outcome.forced_breaks, 2);
        assert_eq!(outcome.oversized_glyphs, 0);
    }

    #[test]
    fn test_single_glyph_wider_than_column() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let outcome = wrapper.wrap_detailed("abc", &style(), 5.0);
        assert_eq!(outcome.lines, vec!["a", "b", "c"]);
        assert_eq!(outcome.oversized_glyphs, 3);
    }

    #[test]
    fn test_zero_width_column_terminates() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let lines = wrapper.wrap("a b", &style(), 0.0);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_paragraphs_are_preserved() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let lines = wrapper.wrap("first\n\nsecond", &style(), 100.0);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_empty_text_yields_one_blank_line() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        assert_eq!(wrapper.wrap("", &style(), 100.0), vec![""]);
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let lines = wrapper.wrap("a\r\nb\rc", &style(), 100.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_whitespace_only_paragraph_is_blank_line() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        assert_eq!(wrapper.wrap("          ", &style(), 30.0), vec![""]);
    }

    #[test]
    fn test_runs_of_spaces_do_not_start_lines() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        let lines = wrapper.wrap("abc    def", &style(), 50.0);
        assert_eq!(lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_lines_fit_with_real_metrics() {
        let metrics = StandardMetrics::new();
        let wrapper = TextWrapper::new(&metrics);
        let style = TextStyle::regular(11.0);
        let text = "Start with an easy jog around the court, then work through \
                    dynamic stretches focusing on hips and shoulders.";
        let lines = wrapper.wrap(text, &style, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_width(line, &style) <= 150.0, "{line:?}");
        }
    }

    #[test]
    fn test_truncate() {
        let wrapper = TextWrapper::new(&FixedMetrics);
        assert_eq!(wrapper.truncate("abcdef", &style(), 35.0), "abc");
        assert_eq!(wrapper.truncate("abc", &style(), 100.0), "abc");
        assert_eq!(wrapper.truncate("abc", &style(), 5.0), "");
    }
}
