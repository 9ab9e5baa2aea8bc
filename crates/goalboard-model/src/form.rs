//! Form state and the parse step that turns it into a typed goal
//!
//! Forms hold raw text exactly as typed. Nothing is coerced until
//! [`GoalDraft::parse`] runs, and an empty string is never read as a number.

use crate::color::HexColor;
use crate::error::ValidationError;
use crate::goal::{Goal, RowIndex, Units};
use std::fmt;

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Free-text label
    Description,
    /// Baseline value
    InitialValue,
    /// Latest measurement
    CurrentValue,
    /// Target value
    EndValue,
    /// Grouping key
    Category,
    /// Display units
    Units,
    /// Bar color
    BgColor,
}

impl Field {
    /// Every field, in form order
    pub const ALL: [Field; 7] = [
        Field::Description,
        Field::InitialValue,
        Field::CurrentValue,
        Field::EndValue,
        Field::Category,
        Field::Units,
        Field::BgColor,
    ];

    /// Wire name of the field
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::InitialValue => "initialValue",
            Field::CurrentValue => "currentValue",
            Field::EndValue => "endValue",
            Field::Category => "category",
            Field::Units => "units",
            Field::BgColor => "bgColor",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Add-form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    /// Free-text label
    pub description: String,
    /// Baseline value as typed
    pub initial_value: String,
    /// Latest measurement as typed; may stay empty
    pub current_value: String,
    /// Target value as typed
    pub end_value: String,
    /// Grouping key
    pub category: String,
    /// Units as selected
    pub units: String,
    /// Color as picked
    pub bg_color: String,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            initial_value: String::new(),
            current_value: String::new(),
            end_value: String::new(),
            category: String::new(),
            units: String::new(),
            bg_color: HexColor::WHITE.to_string(),
        }
    }
}

impl GoalDraft {
    /// Empty form with the default color
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing goal
    #[must_use]
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            description: goal.description.clone(),
            initial_value: format_number(goal.initial_value),
            current_value: goal.current_value.map(format_number).unwrap_or_default(),
            end_value: format_number(goal.end_value),
            category: goal.category.clone(),
            units: goal.units.map(|u| u.as_str().to_string()).unwrap_or_default(),
            bg_color: goal.bg_color.to_string(),
        }
    }

    /// Raw text of a field
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::InitialValue => &self.initial_value,
            Field::CurrentValue => &self.current_value,
            Field::EndValue => &self.end_value,
            Field::Category => &self.category,
            Field::Units => &self.units,
            Field::BgColor => &self.bg_color,
        }
    }

    /// Replace the text of a field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Description => &mut self.description,
            Field::InitialValue => &mut self.initial_value,
            Field::CurrentValue => &mut self.current_value,
            Field::EndValue => &mut self.end_value,
            Field::Category => &mut self.category,
            Field::Units => &mut self.units,
            Field::BgColor => &mut self.bg_color,
        };
        *slot = value.into();
    }

    /// Builder form of [`GoalDraft::set`]
    #[inline]
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Parse and validate into a typed goal
    ///
    /// Required: description, initial value, end value, category, units and
    /// color. The current value is optional.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] in form order
    pub fn parse(&self) -> Result<GoalInput, ValidationError> {
        for field in Field::ALL {
            if field != Field::CurrentValue && self.get(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let initial_value = parse_number(Field::InitialValue, &self.initial_value)?;
        let current_value = if self.current_value.trim().is_empty() {
            None
        } else {
            Some(parse_number(Field::CurrentValue, &self.current_value)?)
        };
        let end_value = parse_number(Field::EndValue, &self.end_value)?;
        let units = self
            .units
            .trim()
            .parse::<Units>()
            .map_err(ValidationError::InvalidUnits)?;
        let bg_color = self.bg_color.trim().parse::<HexColor>()?;

        Ok(GoalInput {
            description: self.description.clone(),
            initial_value,
            current_value,
            end_value,
            category: self.category.clone(),
            units,
            bg_color,
        })
    }
}

/// Edit-form state: a draft bound to a stored row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalEdit {
    /// Field values
    pub draft: GoalDraft,
    /// Row being edited; `None` if the goal never reached the store
    pub row_index: Option<RowIndex>,
}

impl GoalEdit {
    /// Copy a goal and its row into a new edit form
    #[must_use]
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            draft: GoalDraft::from_goal(goal),
            row_index: goal.row_index.clone(),
        }
    }

    /// Parse and validate, requiring a persisted row
    ///
    /// # Errors
    /// Returns a field [`ValidationError`] first, then
    /// [`ValidationError::NotPersisted`] if there is no row to update
    pub fn parse(&self) -> Result<(RowIndex, GoalInput), ValidationError> {
        let input = self.draft.parse()?;
        let row = self.row_index.clone().ok_or(ValidationError::NotPersisted)?;
        Ok((row, input))
    }
}

/// A validated goal ready to be written to the store
#[derive(Debug, Clone, PartialEq)]
pub struct GoalInput {
    /// Free-text label
    pub description: String,
    /// Baseline value
    pub initial_value: f64,
    /// Latest measurement
    pub current_value: Option<f64>,
    /// Target value
    pub end_value: f64,
    /// Grouping key
    pub category: String,
    /// Display units
    pub units: Units,
    /// Bar color
    pub bg_color: HexColor,
}

impl GoalInput {
    /// The goal this input describes, attached to `row` if known
    #[must_use]
    pub fn into_goal(self, row_index: Option<RowIndex>) -> Goal {
        Goal {
            description: self.description,
            initial_value: self.initial_value,
            current_value: self.current_value,
            end_value: self.end_value,
            category: self.category,
            units: Some(self.units),
            bg_color: self.bg_color,
            row_index,
        }
    }
}

fn parse_number(field: Field, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Render a number the way a text field shows it (`10`, not `10.0`)
#[must_use]
pub fn format_number(n: f64) -> String {
    format!("{n}")
}
