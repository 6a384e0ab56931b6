use crate::style::TextStyle;
use crate::text::FontFamily;
use std::collections::HashMap;

/// Capability to measure rendered text.
///
/// The engine only ever asks for widths through this trait, so layout is
/// independent of any concrete text-shaping backend.
pub trait TextMetrics {
    /// Advance width of one glyph at the style's point size.
    fn glyph_width(&self, ch: char, style: &TextStyle) -> f64;

    /// Width of `text` set in `style`. The empty string measures 0.
    fn measure_width(&self, text: &str, style: &TextStyle) -> f64 {
        text.chars().map(|ch| self.glyph_width(ch, style)).sum()
    }
}

/// Character width information for the standard fonts.
/// All widths are in 1/1000 of a unit (font size 1.0)
#[derive(Clone)]
struct GlyphWidths {
    widths: HashMap<char, u16>,
    default_width: u16,
}

impl GlyphWidths {
    fn new(default_width: u16) -> Self {
        Self {
            widths: HashMap::new(),
            default_width,
        }
    }

    fn with_widths(mut self, widths: &[(char, u16)]) -> Self {
        for &(ch, width) in widths {
            self.widths.insert(ch, width);
        }
        self
    }

    fn char_width(&self, ch: char) -> u16 {
        self.widths.get(&ch).copied().unwrap_or(self.default_width)
    }
}

lazy_static::lazy_static! {
    static ref GLYPH_WIDTHS: HashMap<FontFamily, GlyphWidths> = {
        let mut tables = HashMap::new();

        let regular = GlyphWidths::new(556).with_widths(&[
            (' ', 278), ('!', 278), ('"', 355), ('#', 556), ('$', 556), ('%', 889),
            ('&', 667), ('\'', 191), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 278), (';', 278), ('<', 584), ('=', 584),
            ('>', 584), ('?', 556), ('@', 1015), ('A', 667), ('B', 667), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 500), ('K', 667), ('L', 556), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 278),
            ('\\', 278), (']', 278), ('^', 469), ('_', 556), ('`', 333), ('a', 556),
            ('b', 556), ('c', 500), ('d', 556), ('e', 556), ('f', 278), ('g', 556),
            ('h', 556), ('i', 222), ('j', 222), ('k', 500), ('l', 222), ('m', 833),
            ('n', 556), ('o', 556), ('p', 556), ('q', 556), ('r', 333), ('s', 500),
            ('t', 278), ('u', 556), ('v', 500), ('w', 722), ('x', 500), ('y', 500),
            ('z', 500), ('{', 334), ('|', 260), ('}', 334), ('~', 584),
            ('\u{2022}', 350), ('\u{2013}', 556), ('\u{2014}', 1000), ('\u{2026}', 1000),
            ('\u{2018}', 222), ('\u{2019}', 222), ('\u{201C}', 333), ('\u{201D}', 333),
            ('\u{00B0}', 400), ('\u{00D7}', 584),
        ]);

        let bold = GlyphWidths::new(611).with_widths(&[
            (' ', 278), ('!', 333), ('"', 474), ('#', 556), ('$', 556), ('%', 889),
            ('&', 722), ('\'', 238), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 333), (';', 333), ('<', 584), ('=', 584),
            ('>', 584), ('?', 611), ('@', 975), ('A', 722), ('B', 722), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 556), ('K', 722), ('L', 611), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 584), ('_', 556), ('`', 333), ('a', 556),
            ('b', 611), ('c', 556), ('d', 611), ('e', 556), ('f', 333), ('g', 611),
            ('h', 611), ('i', 278), ('j', 278), ('k', 556), ('l', 278), ('m', 889),
            ('n', 611), ('o', 611), ('p', 611), ('q', 611), ('r', 389), ('s', 556),
            ('t', 333), ('u', 611), ('v', 556), ('w', 778), ('x', 556), ('y', 556),
            ('z', 500), ('{', 389), ('|', 280), ('}', 389), ('~', 584),
            ('\u{2022}', 350), ('\u{2013}', 556), ('\u{2014}', 1000), ('\u{2026}', 1000),
            ('\u{2018}', 278), ('\u{2019}', 278), ('\u{201C}', 500), ('\u{201D}', 500),
            ('\u{00B0}', 400), ('\u{00D7}', 584),
        ]);

        // Helvetica-Oblique shares the upright advance widths.
        tables.insert(FontFamily::Italic, regular.clone());
        tables.insert(FontFamily::Regular, regular);
        tables.insert(FontFamily::Bold, bold);

        tables
    };
}

/// Width tables of the standard Helvetica family.
///
/// Characters missing from a table take the family's default width, so
/// every glyph has a positive advance and measurement is monotonic.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl StandardMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl TextMetrics for StandardMetrics {
    fn glyph_width(&self, ch: char, style: &TextStyle) -> f64 {
        let units = GLYPH_WIDTHS
            .get(&style.family)
            .map(|table| table.char_width(ch))
            .unwrap_or(556);
        (units as f64 / 1000.0) * style.size
    }
}
