//! Style configuration for the layout engine.
//!
//! A [`StyleConfiguration`] bundles every knob the engine reads: one
//! [`TextStyle`] per [`StyleRole`], page geometry, box geometry, spacing and
//! indentation constants. The [`Default`] implementation is the reference set
//! used by the exporter.

use crate::error::{ExportError, Result};
use crate::graphics::Color;
use crate::text::FontFamily;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable text style descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStyle {
    pub family: FontFamily,
    /// Point size
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(family: FontFamily, size: f64, color: Color) -> Self {
        Self {
            family,
            size,
            color,
        }
    }

    pub fn regular(size: f64) -> Self {
        Self::new(FontFamily::Regular, size, Color::black())
    }

    pub fn bold(size: f64) -> Self {
        Self::new(FontFamily::Bold, size, Color::black())
    }

    pub fn italic(size: f64) -> Self {
        Self::new(FontFamily::Italic, size, Color::black())
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// The role a piece of text plays in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    Title,
    Description,
    UnitHeader,
    UnitWeekday,
    UnitDescription,
    ExerciseName,
    ExerciseDescription,
    ExerciseDetails,
    Placeholder,
    Footer,
}

impl StyleRole {
    pub const ALL: [StyleRole; 10] = [
        StyleRole::Title,
        StyleRole::Description,
        StyleRole::UnitHeader,
        StyleRole::UnitWeekday,
        StyleRole::UnitDescription,
        StyleRole::ExerciseName,
        StyleRole::ExerciseDescription,
        StyleRole::ExerciseDetails,
        StyleRole::Placeholder,
        StyleRole::Footer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StyleRole::Title => "title",
            StyleRole::Description => "description",
            StyleRole::UnitHeader => "unit_header",
            StyleRole::UnitWeekday => "unit_weekday",
            StyleRole::UnitDescription => "unit_description",
            StyleRole::ExerciseName => "exercise_name",
            StyleRole::ExerciseDescription => "exercise_description",
            StyleRole::ExerciseDetails => "exercise_details",
            StyleRole::Placeholder => "placeholder",
            StyleRole::Footer => "footer",
        }
    }
}

impl fmt::Display for StyleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleRole {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        StyleRole::ALL
            .iter()
            .copied()
            .find(|role| role.name() == s)
            .ok_or_else(|| ExportError::UnknownStyleRole(s.to_string()))
    }
}

/// Vertical spacing amounts in points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Spacing {
    /// Between the plan title and its description
    pub title_gap: f64,
    /// Above and below the separator rule
    pub separator_gap: f64,
    /// Between consecutive unit boxes
    pub unit_gap: f64,
    /// Between consecutive exercise boxes
    pub exercise_gap: f64,
    /// Between the lines of a unit header block
    pub header_gap: f64,
    /// Between a unit header block and its exercises
    pub section_gap: f64,
    /// Between the lines of an exercise block
    pub detail_gap: f64,
    /// Inner top/bottom padding of a unit box
    pub unit_padding: f64,
    /// Inner top/bottom padding of an exercise box
    pub exercise_padding: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            title_gap: 6.0,
            separator_gap: 12.0,
            unit_gap: 16.0,
            exercise_gap: 6.0,
            header_gap: 4.0,
            section_gap: 8.0,
            detail_gap: 3.0,
            unit_padding: 10.0,
            exercise_padding: 8.0,
        }
    }
}

/// Horizontal offsets measured from the content area edges.
///
/// Offsets apply symmetrically: a column indented by 10 points loses 10
/// points on each side, so nested boxes keep their text inside the border.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Indentation {
    pub unit_text: f64,
    pub exercise_box: f64,
    pub exercise_text: f64,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            unit_text: 10.0,
            exercise_box: 20.0,
            exercise_text: 30.0,
        }
    }
}

/// Fill and stroke colors of the drawn containers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoxColors {
    pub unit_fill: Color,
    pub exercise_fill: Color,
    pub border: Color,
    pub separator: Color,
}

impl Default for BoxColors {
    fn default() -> Self {
        Self {
            unit_fill: Color::rgb(0.925, 0.945, 0.975),
            exercise_fill: Color::rgb(0.985, 0.985, 0.985),
            border: Color::gray(0.6),
            separator: Color::gray(0.5),
        }
    }
}

/// Every overridable knob of the layout engine.
///
/// # Example
///
/// ```rust
/// use drillbook::{StyleConfiguration, StyleRole, TextStyle};
///
/// let mut style = StyleConfiguration::default().with_margin(40.0);
/// style.set_style_by_name("title", TextStyle::bold(24.0))?;
/// assert_eq!(style.style(StyleRole::Title).size, 24.0);
/// style.validate()?;
/// # Ok::<(), drillbook::ExportError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleConfiguration {
    pub title_style: TextStyle,
    pub description_style: TextStyle,
    pub unit_header_style: TextStyle,
    pub unit_weekday_style: TextStyle,
    pub unit_description_style: TextStyle,
    pub exercise_name_style: TextStyle,
    pub exercise_description_style: TextStyle,
    pub exercise_details_style: TextStyle,
    pub placeholder_style: TextStyle,
    pub footer_style: TextStyle,
    pub margin: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub border_radius_unit: f64,
    pub border_radius_exercise: f64,
    pub border_width: f64,
    pub base_line_spacing_factor: f64,
    /// Extra leading added to every line of a paragraph that wraps onto
    /// more than one line
    pub extra_line_spacing: f64,
    pub spacing: Spacing,
    pub indentation: Indentation,
    pub colors: BoxColors,
    /// Footer text; `{{page_number}}` and `{{plan_name}}` are substituted
    pub footer_template: String,
}

impl Default for StyleConfiguration {
    fn default() -> Self {
        let dark = Color::gray(0.2);
        let muted = Color::gray(0.45);
        Self {
            title_style: TextStyle::bold(20.0),
            description_style: TextStyle::regular(11.0).with_color(dark),
            unit_header_style: TextStyle::bold(14.0),
            unit_weekday_style: TextStyle::italic(10.0).with_color(dark),
            unit_description_style: TextStyle::regular(10.0).with_color(dark),
            exercise_name_style: TextStyle::bold(12.0),
            exercise_description_style: TextStyle::regular(10.0).with_color(dark),
            exercise_details_style: TextStyle::italic(9.0).with_color(dark),
            placeholder_style: TextStyle::italic(10.0).with_color(muted),
            footer_style: TextStyle::regular(8.0).with_color(muted),
            margin: 50.0,
            page_width: 595.0,
            page_height: 842.0,
            border_radius_unit: 8.0,
            border_radius_exercise: 5.0,
            border_width: 1.0,
            base_line_spacing_factor: 1.2,
            extra_line_spacing: 2.0,
            spacing: Spacing::default(),
            indentation: Indentation::default(),
            colors: BoxColors::default(),
            footer_template: "Page {{page_number}}".to_string(),
        }
    }
}

impl StyleConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON; absent keys keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StyleConfiguration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn style(&self, role: StyleRole) -> &TextStyle {
        match role {
            StyleRole::Title => &self.title_style,
            StyleRole::Description => &self.description_style,
            StyleRole::UnitHeader => &self.unit_header_style,
            StyleRole::UnitWeekday => &self.unit_weekday_style,
            StyleRole::UnitDescription => &self.unit_description_style,
            StyleRole::ExerciseName => &self.exercise_name_style,
            StyleRole::ExerciseDescription => &self.exercise_description_style,
            StyleRole::ExerciseDetails => &self.exercise_details_style,
            StyleRole::Placeholder => &self.placeholder_style,
            StyleRole::Footer => &self.footer_style,
        }
    }

    pub fn set_style(&mut self, role: StyleRole, style: TextStyle) {
        let slot = match role {
            StyleRole::Title => &mut self.title_style,
            StyleRole::Description => &mut self.description_style,
            StyleRole::UnitHeader => &mut self.unit_header_style,
            StyleRole::UnitWeekday => &mut self.unit_weekday_style,
            StyleRole::UnitDescription => &mut self.unit_description_style,
            StyleRole::ExerciseName => &mut self.exercise_name_style,
            StyleRole::ExerciseDescription => &mut self.exercise_description_style,
            StyleRole::ExerciseDetails => &mut self.exercise_details_style,
            StyleRole::Placeholder => &mut self.placeholder_style,
            StyleRole::Footer => &mut self.footer_style,
        };
        *slot = style;
    }

    /// Looks the role up by its snake_case name.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownStyleRole`] for names outside the fixed
    /// set of roles.
    pub fn set_style_by_name(&mut self, role: &str, style: TextStyle) -> Result<()> {
        let role = role.parse::<StyleRole>()?;
        self.set_style(role, style);
        Ok(())
    }

    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_line_spacing(mut self, factor: f64, extra: f64) -> Self {
        self.base_line_spacing_factor = factor;
        self.extra_line_spacing = extra;
        self
    }

    pub fn with_border(mut self, width: f64, unit_radius: f64, exercise_radius: f64) -> Self {
        self.border_width = width;
        self.border_radius_unit = unit_radius;
        self.border_radius_exercise = exercise_radius;
        self
    }

    pub fn with_footer_template(mut self, template: impl Into<String>) -> Self {
        self.footer_template = template.into();
        self
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Y coordinate of the first writable position on a fresh page.
    pub fn content_top(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Width of a text column indented by `indent` on both sides.
    pub fn column_width(&self, indent: f64) -> f64 {
        self.content_width() - 2.0 * indent
    }

    /// Vertical extent of one line of a paragraph wrapped into `line_count` lines.
    pub fn line_height(&self, style: &TextStyle, line_count: usize) -> f64 {
        style.size * self.base_line_spacing_factor + self.extra_leading(line_count)
    }

    pub fn extra_leading(&self, line_count: usize) -> f64 {
        if line_count > 1 {
            self.extra_line_spacing
        } else {
            0.0
        }
    }

    /// Checks geometry and styles before any layout happens.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidConfiguration`] describing the first
    /// offending value.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(ExportError::InvalidConfiguration(message))
        }

        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("base_line_spacing_factor", self.base_line_spacing_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }

        let non_negative = [
            ("margin", self.margin),
            ("border_radius_unit", self.border_radius_unit),
            ("border_radius_exercise", self.border_radius_exercise),
            ("border_width", self.border_width),
            ("extra_line_spacing", self.extra_line_spacing),
            ("spacing.title_gap", self.spacing.title_gap),
            ("spacing.separator_gap", self.spacing.separator_gap),
            ("spacing.unit_gap", self.spacing.unit_gap),
            ("spacing.exercise_gap", self.spacing.exercise_gap),
            ("spacing.header_gap", self.spacing.header_gap),
            ("spacing.section_gap", self.spacing.section_gap),
            ("spacing.detail_gap", self.spacing.detail_gap),
            ("spacing.unit_padding", self.spacing.unit_padding),
            ("spacing.exercise_padding", self.spacing.exercise_padding),
            ("indentation.unit_text", self.indentation.unit_text),
            ("indentation.exercise_box", self.indentation.exercise_box),
            ("indentation.exercise_text", self.indentation.exercise_text),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must not be negative, got {value}"));
            }
        }

        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return invalid(format!(
                "margin {} leaves no content area on a {}x{} page",
                self.margin, self.page_width, self.page_height
            ));
        }

        if self.column_width(self.indentation.exercise_text) <= 0.0 {
            return invalid(format!(
                "exercise text indent {} leaves no room on a content width of {}",
                self.indentation.exercise_text,
                self.content_width()
            ));
        }

        for role in StyleRole::ALL {
            let size = self.style(role).size;
            if !size.is_finite() || size <= 0.0 {
                return invalid(format!("{role} font size must be positive, got {size}"));
            }
        }

        Ok(())
    }
}
