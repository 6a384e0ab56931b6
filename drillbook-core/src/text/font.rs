#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font family tag of a text style.
///
/// Each family maps onto one of the standard Type 1 fonts, which every PDF
/// reader provides without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FontFamily {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
    /// Helvetica-Oblique
    Italic,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [FontFamily::Regular, FontFamily::Bold, FontFamily::Italic];

    /// Base font name written into the font dictionary.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FontFamily::Regular => "Helvetica",
            FontFamily::Bold => "Helvetica-Bold",
            FontFamily::Italic => "Helvetica-Oblique",
        }
    }

    /// Resource name used by content streams (`/F1 12 Tf`).
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFamily::Regular => "F1",
            FontFamily::Bold => "F2",
            FontFamily::Italic => "F3",
        }
    }
}
