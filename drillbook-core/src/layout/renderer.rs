use super::{BreakReason, ContainerRenderer, HeightEstimator, PageCursor, Placement};
use crate::error::Result;
use crate::model::{Exercise, Plan, Unit, NO_EXERCISES, NO_UNITS};
use crate::page::{ContainerKind, Page};
use crate::style::{StyleConfiguration, StyleRole};
use crate::text::TextMetrics;
use tracing::{debug, trace};

/// Walks a plan top to bottom and lays it out on pages.
pub struct DocumentRenderer<'a> {
    config: &'a StyleConfiguration,
    metrics: &'a dyn TextMetrics,
    estimator: HeightEstimator<'a>,
    containers: ContainerRenderer<'a>,
}

impl<'a> DocumentRenderer<'a> {
    /// Validates the configuration once; rendering itself cannot fail.
    pub fn new(config: &'a StyleConfiguration, metrics: &'a dyn TextMetrics) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics,
            estimator: HeightEstimator::new(config, metrics),
            containers: ContainerRenderer::new(config),
        })
    }

    pub fn estimator(&self) -> &HeightEstimator<'a> {
        &self.estimator
    }

    /// Starts a render context for `plan` (used for the footer).
    pub fn cursor(&self, plan: &Plan) -> PageCursor<'a> {
        PageCursor::new(self.config, self.metrics, plan.display_name())
    }

    pub fn render(&self, plan: &Plan) -> Vec<Page> {
        let mut cursor = self.cursor(plan);

        self.render_title(&mut cursor, plan);
        cursor.draw_separator(self.config.spacing.separator_gap);

        if plan.units.is_empty() {
            cursor.write_wrapped(
                NO_UNITS,
                0.0,
                self.config.style(StyleRole::Placeholder),
                StyleRole::Placeholder,
            );
        }

        for (index, unit) in plan.units.iter().enumerate() {
            let gap = if index == 0 {
                0.0
            } else {
                self.config.spacing.unit_gap
            };
            let needed = gap + self.estimator.min_unit_height(unit);

            if !cursor.fits(needed) && !cursor.is_fresh() {
                debug!(
                    unit = unit.display_name(),
                    needed,
                    remaining = cursor.remaining(),
                    "moving unit header to next page"
                );
                cursor.break_page(BreakReason::OrphanAvoidance);
            } else if gap > 0.0 {
                cursor.add_spacing(gap);
            }

            self.render_unit(&mut cursor, unit);
        }

        cursor.finish()
    }

    /// Plan title and optional description.
    pub fn render_title(&self, cursor: &mut PageCursor<'_>, plan: &Plan) {
        cursor.write_wrapped(
            plan.display_name(),
            0.0,
            self.config.style(StyleRole::Title),
            StyleRole::Title,
        );
        if let Some(description) = plan.display_description() {
            cursor.add_spacing(self.config.spacing.title_gap);
            cursor.write_wrapped(
                description,
                0.0,
                self.config.style(StyleRole::Description),
                StyleRole::Description,
            );
        }
    }

    /// One unit box with its header and every exercise.
    pub fn render_unit(&self, cursor: &mut PageCursor<'_>, unit: &Unit) {
        let height = self.estimator.unit_height(unit);
        let placement = self.containers.begin(cursor, ContainerKind::Unit, height);
        trace!(unit = unit.display_name(), height, ?placement, "rendering unit");

        let spacing = &self.config.spacing;
        let indent = self.config.indentation.unit_text;

        cursor.add_spacing(spacing.unit_padding);
        self.render_unit_header(cursor, unit);

        if unit.exercises.is_empty() {
            cursor.write_wrapped(
                NO_EXERCISES,
                indent,
                self.config.style(StyleRole::Placeholder),
                StyleRole::Placeholder,
            );
        }
        for (index, exercise) in unit.exercises.iter().enumerate() {
            if index > 0 {
                cursor.add_spacing(spacing.exercise_gap);
            }
            self.render_exercise(cursor, exercise);
        }

        cursor.add_trailing_spacing(spacing.unit_padding);
        self.containers.end(cursor);
    }

    fn render_unit_header(&self, cursor: &mut PageCursor<'_>, unit: &Unit) {
        let spacing = &self.config.spacing;
        let indent = self.config.indentation.unit_text;

        cursor.write_wrapped(
            &unit.header_line(),
            indent,
            self.config.style(StyleRole::UnitHeader),
            StyleRole::UnitHeader,
        );
        cursor.add_spacing(spacing.header_gap);
        cursor.write_wrapped(
            &unit.weekday_line(),
            indent,
            self.config.style(StyleRole::UnitWeekday),
            StyleRole::UnitWeekday,
        );
        if let Some(description) = unit.display_description() {
            cursor.add_spacing(spacing.header_gap);
            cursor.write_wrapped(
                description,
                indent,
                self.config.style(StyleRole::UnitDescription),
                StyleRole::UnitDescription,
            );
        }
        cursor.add_spacing(spacing.section_gap);
    }

    /// One exercise box. The break check happens before the box is drawn,
    /// so a box is never drawn and split straight away. The closing padding
    /// may be cut short by the bottom margin.
    pub fn render_exercise(&self, cursor: &mut PageCursor<'_>, exercise: &Exercise) {
        let height = self.estimator.exercise_height(exercise);
        if !cursor.fits(height - self.config.spacing.exercise_padding)
            && !cursor.is_fresh()
            && !cursor.fits(self.estimator.min_exercise_height(exercise))
        {
            cursor.break_page(BreakReason::ExerciseStart);
        }

        let placement = self
            .containers
            .begin(cursor, ContainerKind::Exercise, height);
        if placement == Placement::Overflows {
            trace!(exercise = exercise.display_name(), height, "exercise box continues");
        }

        let spacing = &self.config.spacing;
        let indent = self.config.indentation.exercise_text;

        cursor.add_spacing(spacing.exercise_padding);
        cursor.write_wrapped(
            exercise.display_name(),
            indent,
            self.config.style(StyleRole::ExerciseName),
            StyleRole::ExerciseName,
        );
        if let Some(description) = exercise.display_description() {
            cursor.add_spacing(spacing.detail_gap);
            cursor.write_wrapped(
                description,
                indent,
                self.config.style(StyleRole::ExerciseDescription),
                StyleRole::ExerciseDescription,
            );
        }
        cursor.add_spacing(spacing.detail_gap);
        cursor.write_wrapped(
            &exercise.details_line(),
            indent,
            self.config.style(StyleRole::ExerciseDetails),
            StyleRole::ExerciseDetails,
        );
        cursor.add_trailing_spacing(spacing.exercise_padding);

        self.containers.end(cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use crate::page::PageElement;
    use crate::text::StandardMetrics;

    fn squats() -> Exercise {
        Exercise::new("Squats").with_duration("10 min").with_sets(3)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exercise_displacement_matches_estimate() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();
        let exercise = squats().with_description(
            "Feet shoulder-width apart, sit back until the thighs are parallel to the floor, \
             then drive up through the heels. Keep the chest up for the whole movement.",
        );

        let mut cursor = renderer.cursor(&Plan::new("x"));
        let start = cursor.y();
        renderer.render_exercise(&mut cursor, &exercise);

        let moved = start - cursor.y();
        assert!(approx(moved, renderer.estimator().exercise_height(&exercise)));
    }

    #[test]
    fn test_unit_displacement_matches_estimate() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();
        let unit = Unit::new("Leg Day", Weekday::Monday)
            .with_description("Lower body strength")
            .with_exercises([squats(), squats().with_equipment(true)]);

        let mut cursor = renderer.cursor(&Plan::new("x"));
        let start = cursor.y();
        renderer.render_unit(&mut cursor, &unit);

        assert!(approx(start - cursor.y(), renderer.estimator().unit_height(&unit)));
        let pages = cursor.finish();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_fitting_unit_box_has_estimated_height() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();
        let unit = Unit::new("Leg Day", Weekday::Monday).with_exercise(squats());

        let mut cursor = renderer.cursor(&Plan::new("x"));
        renderer.render_unit(&mut cursor, &unit);
        let pages = cursor.finish();

        let unit_box = pages[0].boxes(ContainerKind::Unit).next().unwrap();
        match unit_box {
            PageElement::Box { height, y, .. } => {
                assert!(approx(*height, renderer.estimator().unit_height(&unit)));
                assert!(approx(*y + *height, config.content_top()));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_invalid_configuration_is_rejected_up_front() {
        let config = StyleConfiguration::default().with_page_size(0.0, 0.0);
        let metrics = StandardMetrics::new();
        assert!(DocumentRenderer::new(&config, &metrics).is_err());
    }

    #[test]
    fn test_exercise_start_breaks_before_drawing_box() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();

        let mut cursor = renderer.cursor(&Plan::new("x"));
        cursor.add_spacing(config.content_height() - 10.0);
        renderer.render_exercise(&mut cursor, &squats());
        let pages = cursor.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].boxes(ContainerKind::Exercise).count(), 0);
        assert_eq!(pages[1].boxes(ContainerKind::Exercise).count(), 1);
        assert!(pages[1].contains_text("Squats"));
    }

    #[test]
    fn test_exercise_short_of_closing_padding_stays_on_page() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();
        let height = renderer.estimator().exercise_height(&squats());

        // Everything but the last 4 points of padding fits.
        let mut cursor = renderer.cursor(&Plan::new("x"));
        cursor.add_spacing(config.content_height() - height + 4.0);
        renderer.render_exercise(&mut cursor, &squats());
        assert_eq!(cursor.page_number(), 1);
        assert!(approx(cursor.y(), config.margin));

        let pages = cursor.finish();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("Squats"));
        match pages[0].boxes(ContainerKind::Exercise).next().unwrap() {
            PageElement::Box { y, height: drawn, continuation, .. } => {
                assert!(approx(*y, config.margin));
                assert!(approx(*drawn, height - 4.0));
                assert!(!continuation);
            }
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_unit_closing_padding_never_carries_boxes_over() {
        let config = StyleConfiguration::default();
        let metrics = StandardMetrics::new();
        let renderer = DocumentRenderer::new(&config, &metrics).unwrap();
        let unit = Unit::new("Leg Day", Weekday::Monday).with_exercise(squats());
        let height = renderer.estimator().unit_height(&unit);

        // The unit's own padding and part of the exercise's are cut off.
        let mut cursor = renderer.cursor(&Plan::new("x"));
        cursor.add_spacing(config.content_height() - height + 12.0);
        renderer.render_unit(&mut cursor, &unit);

        let pages = cursor.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].boxes(ContainerKind::Unit).count(), 1);
        assert_eq!(pages[0].boxes(ContainerKind::Exercise).count(), 1);
        assert!(pages[0].contains_text("Squats"));
    }
}
