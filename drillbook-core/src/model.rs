//! The document tree handed to the layout engine.
//!
//! The tree is read-only for the duration of a render. Blank text fields
//! are replaced with placeholder strings by the accessors below, so the
//! layout code never deals with missing values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const UNNAMED_PLAN: &str = "[Unnamed Plan]";
pub const UNNAMED_UNIT: &str = "[Unnamed Unit]";
pub const UNNAMED_EXERCISE: &str = "[Unnamed Exercise]";
pub const NO_DURATION: &str = "[No duration]";
pub const NO_UNITS: &str = "[No training units defined]";
pub const NO_EXERCISES: &str = "[No exercises defined]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Upper-case tag as shown in unit headers.
    pub fn tag(&self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Exercise {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub sets: u32,
    /// Whether the ball bucket is needed for this exercise
    pub equipment_required: bool,
}

impl Default for Exercise {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            duration: String::new(),
            sets: 0,
            equipment_required: false,
        }
    }
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = sets;
        self
    }

    pub fn with_equipment(mut self, required: bool) -> Self {
        self.equipment_required = required;
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(UNNAMED_EXERCISE)
    }

    pub fn display_description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    pub fn display_duration(&self) -> &str {
        non_blank(&self.duration).unwrap_or(NO_DURATION)
    }

    /// `Duration: 10 min • Sets: 3 • Ball Bucket: No`
    pub fn details_line(&self) -> String {
        format!(
            "Duration: {} \u{2022} Sets: {} \u{2022} Ball Bucket: {}",
            self.display_duration(),
            self.sets,
            if self.equipment_required { "Yes" } else { "No" }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unit {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub weekday: Weekday,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exercises: Vec<Exercise>,
}

impl Unit {
    pub fn new(name: impl Into<String>, weekday: Weekday) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            weekday,
            exercises: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    pub fn with_exercises(mut self, exercises: impl IntoIterator<Item = Exercise>) -> Self {
        self.exercises.extend(exercises);
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(UNNAMED_UNIT)
    }

    pub fn display_description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    /// `Leg Day (MONDAY)`
    pub fn header_line(&self) -> String {
        format!("{} ({})", self.display_name(), self.weekday.tag())
    }

    /// `Day: Monday`
    pub fn weekday_line(&self) -> String {
        format!("Day: {}", self.weekday.name())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Plan {
    pub name: String,
    pub description: String,
    pub units: Vec<Unit>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(UNNAMED_PLAN)
    }

    pub fn display_description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    pub fn exercise_count(&self) -> usize {
        self.units.iter().map(|unit| unit.exercises.len()).sum()
    }
}
