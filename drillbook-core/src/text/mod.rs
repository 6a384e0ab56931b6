mod encoding;
mod font;
mod metrics;
mod wrap;

pub use encoding::{encode_win_ansi, win_ansi_byte};
pub use font::FontFamily;
pub use metrics::{StandardMetrics, TextMetrics};
pub use wrap::{normalize_line_endings, TextWrapper, WrapOutcome};
