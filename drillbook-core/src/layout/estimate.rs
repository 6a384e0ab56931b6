use crate::model::{Exercise, Plan, Unit, NO_EXERCISES, NO_UNITS};
use crate::style::{StyleConfiguration, StyleRole, TextStyle};
use crate::text::{TextMetrics, TextWrapper};

/// Computes block heights without rendering anything.
///
/// Every estimate mirrors the sequence of writes the matching render routine
/// in [`DocumentRenderer`](super::DocumentRenderer) performs, so a block
/// rendered without a page break moves the cursor by exactly its estimate.
#[derive(Clone, Copy)]
pub struct HeightEstimator<'a> {
    config: &'a StyleConfiguration,
    wrapper: TextWrapper<'a>,
}

impl<'a> HeightEstimator<'a> {
    pub fn new(config: &'a StyleConfiguration, metrics: &'a dyn TextMetrics) -> Self {
        Self {
            config,
            wrapper: TextWrapper::new(metrics),
        }
    }

    /// Height of `content` wrapped to `width`: one leading per line.
    pub fn block_height(&self, content: &str, style: &TextStyle, width: f64) -> f64 {
        let lines = self.wrapper.wrap(content, style, width).len();
        lines as f64 * self.config.line_height(style, lines)
    }

    fn text_height(&self, content: &str, role: StyleRole, indent: f64) -> f64 {
        self.block_height(
            content,
            self.config.style(role),
            self.config.column_width(indent),
        )
    }

    /// Title plus the optional description below it.
    pub fn title_height(&self, plan: &Plan) -> f64 {
        let mut height = self.text_height(plan.display_name(), StyleRole::Title, 0.0);
        if let Some(description) = plan.display_description() {
            height += self.config.spacing.title_gap
                + self.text_height(description, StyleRole::Description, 0.0);
        }
        height
    }

    pub fn separator_height(&self) -> f64 {
        2.0 * self.config.spacing.separator_gap
    }

    pub fn no_units_height(&self) -> f64 {
        self.text_height(NO_UNITS, StyleRole::Placeholder, 0.0)
    }

    /// Header line, weekday line, optional description and the gap that
    /// separates them from the exercises.
    pub fn unit_header_height(&self, unit: &Unit) -> f64 {
        let indent = self.config.indentation.unit_text;
        let spacing = &self.config.spacing;

        let mut height = self.text_height(&unit.header_line(), StyleRole::UnitHeader, indent)
            + spacing.header_gap
            + self.text_height(&unit.weekday_line(), StyleRole::UnitWeekday, indent);
        if let Some(description) = unit.display_description() {
            height += spacing.header_gap
                + self.text_height(description, StyleRole::UnitDescription, indent);
        }
        height + spacing.section_gap
    }

    pub fn no_exercises_height(&self) -> f64 {
        self.text_height(
            NO_EXERCISES,
            StyleRole::Placeholder,
            self.config.indentation.unit_text,
        )
    }

    /// Full box height of an exercise including its padding.
    pub fn exercise_height(&self, exercise: &Exercise) -> f64 {
        let indent = self.config.indentation.exercise_text;
        let spacing = &self.config.spacing;

        let mut height = self.text_height(exercise.display_name(), StyleRole::ExerciseName, indent);
        if let Some(description) = exercise.display_description() {
            height += spacing.detail_gap
                + self.text_height(description, StyleRole::ExerciseDescription, indent);
        }
        height += spacing.detail_gap
            + self.text_height(&exercise.details_line(), StyleRole::ExerciseDetails, indent);
        height + 2.0 * spacing.exercise_padding
    }

    /// Room an exercise box needs to start on a page: its top padding and
    /// the first line of its name.
    pub fn min_exercise_height(&self, exercise: &Exercise) -> f64 {
        let style = self.config.style(StyleRole::ExerciseName);
        let width = self.config.column_width(self.config.indentation.exercise_text);
        let lines = self.wrapper.wrap(exercise.display_name(), style, width).len();
        self.config.spacing.exercise_padding + self.config.line_height(style, lines)
    }

    fn exercises_height(&self, unit: &Unit) -> f64 {
        if unit.exercises.is_empty() {
            return self.no_exercises_height();
        }
        let boxes: f64 = unit
            .exercises
            .iter()
            .map(|exercise| self.exercise_height(exercise))
            .sum();
        boxes + (unit.exercises.len() - 1) as f64 * self.config.spacing.exercise_gap
    }

    /// Full box height of a unit including every exercise.
    pub fn unit_height(&self, unit: &Unit) -> f64 {
        2.0 * self.config.spacing.unit_padding
            + self.unit_header_height(unit)
            + self.exercises_height(unit)
    }

    /// Height that must fit on the page for a unit to start there: the
    /// header together with the first exercise (or the placeholder).
    pub fn min_unit_height(&self, unit: &Unit) -> f64 {
        let first = match unit.exercises.first() {
            Some(exercise) => self.exercise_height(exercise),
            None => self.no_exercises_height(),
        };
        self.config.spacing.unit_padding + self.unit_header_height(unit) + first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use crate::text::StandardMetrics;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_block_height_single_and_multi_line() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let estimator = HeightEstimator::new(&config, &metrics);
        let style = TextStyle::regular(10.0);

        assert!(approx(estimator.block_height("short", &style, 400.0), 12.0));
        assert!(approx(estimator.block_height("a\nb\nc", &style, 400.0), 42.0));
        assert!(approx(estimator.block_height("", &style, 400.0), 12.0));
    }

    #[test]
    fn test_exercise_height() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let estimator = HeightEstimator::new(&config, &metrics);
        let exercise = Exercise::new("Squats").with_duration("10 min").with_sets(3);

        // name 12 * 1.2 + detail gap 3 + details 9 * 1.2 + padding 2 * 8
        let expected = 14.4 + 3.0 + 10.8 + 16.0;
        assert!(approx(estimator.exercise_height(&exercise), expected));

        let described = exercise.clone().with_description("Keep the back straight");
        let with_description = expected + 3.0 + 12.0;
        assert!(approx(estimator.exercise_height(&described), with_description));
    }

    #[test]
    fn test_unit_heights() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let estimator = HeightEstimator::new(&config, &metrics);

        let exercise = Exercise::new("Squats").with_duration("10 min").with_sets(3);
        let unit = Unit::new("Leg Day", Weekday::Monday)
            .with_exercises([exercise.clone(), exercise.clone(), exercise.clone()]);

        // header 14 * 1.2 + gap 4 + weekday 10 * 1.2 + section gap 8
        let header = 16.8 + 4.0 + 12.0 + 8.0;
        assert!(approx(estimator.unit_header_height(&unit), header));

        let ex = estimator.exercise_height(&exercise);
        let full = 20.0 + header + 3.0 * ex + 2.0 * 6.0;
        assert!(approx(estimator.unit_height(&unit), full));

        let min = 10.0 + header + ex;
        assert!(approx(estimator.min_unit_height(&unit), min));
        assert!(estimator.min_unit_height(&unit) < estimator.unit_height(&unit));
    }

    #[test]
    fn test_unit_without_exercises_uses_placeholder() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let estimator = HeightEstimator::new(&config, &metrics);
        let unit = Unit::new("Rest", Weekday::Sunday);

        let expected = 20.0 + estimator.unit_header_height(&unit) + 12.0;
        assert!(approx(estimator.unit_height(&unit), expected));
    }

    #[test]
    fn test_title_height() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let estimator = HeightEstimator::new(&config, &metrics);

        assert!(approx(estimator.title_height(&Plan::new("Week 1")), 24.0));
        let described = Plan::new("Week 1").with_description("Base building");
        assert!(approx(estimator.title_height(&described), 24.0 + 6.0 + 13.2));
    }
}
