//! Wire shapes of the goal store
//!
//! Reads come back as a JSON array of loosely typed records: spreadsheet
//! cells arrive as numbers, numeric strings, or `""` for blanks. Each record
//! is decoded on its own so one bad row never sinks the whole read.
//!
//! Writes are JSON bodies posted to the same endpoint; see [`Mutation`].

use crate::error::StoreError;
use goalboard_model::{
    format_number, Field, Goal, GoalDraft, GoalEdit, GoalInput, HexColor, RowIndex,
    ValidationError,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;

/// A single cell as the store sends it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
enum Cell {
    #[default]
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    fn text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Blank cells are `None`; anything else must be a finite number
    fn number(&self, field: Field) -> Result<Option<f64>, RecordRejection> {
        let reject = || RecordRejection::BadNumber {
            field,
            raw: self.text(),
        };
        match self {
            Cell::Null => Ok(None),
            Cell::Number(n) if n.is_finite() => Ok(Some(*n)),
            Cell::Text(s) if s.trim().is_empty() => Ok(None),
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(reject),
            Cell::Number(_) | Cell::Bool(_) => Err(reject()),
        }
    }

    fn row_index(&self) -> Result<Option<RowIndex>, RecordRejection> {
        match self {
            Cell::Null => Ok(None),
            Cell::Text(s) => Ok(RowIndex::text(s)),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Cell::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64 => {
                Ok(RowIndex::number(*n as u64))
            }
            Cell::Number(_) | Cell::Bool(_) => Err(RecordRejection::BadRowIndex(self.text())),
        }
    }
}

/// One record of a read response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredRecord {
    description: Cell,
    initial_value: Cell,
    current_value: Cell,
    end_value: Cell,
    category: Cell,
    units: Cell,
    bg_color: Cell,
    row_index: Cell,
}

impl StoredRecord {
    fn into_goal(self) -> Result<Goal, RecordRejection> {
        let end_value = self
            .end_value
            .number(Field::EndValue)?
            .ok_or(RecordRejection::MissingEndValue)?;
        let initial_value = self.initial_value.number(Field::InitialValue)?.unwrap_or(0.0);
        let current_value = self.current_value.number(Field::CurrentValue)?;

        let color_text = self.bg_color.text();
        let bg_color = if color_text.trim().is_empty() {
            HexColor::default()
        } else {
            color_text
                .trim()
                .parse()
                .map_err(|_| RecordRejection::BadColor(color_text.clone()))?
        };

        // unknown units are kept as "no units" rather than dropping the goal
        let units = self.units.text().trim().parse().ok();

        Ok(Goal {
            description: self.description.text(),
            initial_value,
            current_value,
            end_value,
            category: self.category.text(),
            units,
            bg_color,
            row_index: self.row_index.row_index()?,
        })
    }
}

/// Why a stored record could not become a goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    /// Record is not an object of cells
    NotARecord(String),
    /// No target value
    MissingEndValue,
    /// Numeric cell holds text
    BadNumber {
        /// Offending field
        field: Field,
        /// Cell content
        raw: String,
    },
    /// Color cell is not `#rrggbb`
    BadColor(String),
    /// Row key is neither a non-negative integer nor text
    BadRowIndex(String),
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARecord(reason) => write!(f, "not a record: {reason}"),
            Self::MissingEndValue => f.write_str("missing endValue"),
            Self::BadNumber { field, raw } => write!(f, "{field} is not a number: {raw:?}"),
            Self::BadColor(raw) => write!(f, "bad bgColor {raw:?}"),
            Self::BadRowIndex(raw) => write!(f, "bad rowIndex {raw:?}"),
        }
    }
}

/// Result of decoding a read response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    /// Records that decoded into goals, in response order
    pub goals: Vec<Goal>,
    /// Records that did not decode, with their position
    pub rejected: Vec<(usize, RecordRejection)>,
}

/// Decode a read response body
///
/// The body must be a JSON array; each element is decoded independently and
/// failures are collected rather than propagated. The display filter is not
/// applied here.
///
/// # Errors
/// Returns [`StoreError::MalformedResponse`] if the body is not a JSON array
pub fn decode_records(body: &str) -> Result<Decoded, StoreError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::MalformedResponse(format!(
                "expected a JSON array, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut decoded = Decoded::default();
    for (position, item) in items.iter().enumerate() {
        let outcome = StoredRecord::deserialize(item)
            .map_err(|e| RecordRejection::NotARecord(e.to_string()))
            .and_then(StoredRecord::into_goal);
        match outcome {
            Ok(goal) => decoded.goals.push(goal),
            Err(rejection) => decoded.rejected.push((position, rejection)),
        }
    }
    Ok(decoded)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Kind of write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Append a new goal
    Create,
    /// Replace the goal at a row
    Update,
    /// Remove the goal at a row
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}

/// A validated write, ready to dispatch
///
/// Only constructible through the validating constructors, so a `Mutation`
/// always carries a complete goal and, for updates and deletes, a persisted
/// row.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append a new goal
    Create(GoalInput),
    /// Replace the goal at `row`
    Update {
        /// Target row
        row: RowIndex,
        /// Replacement goal
        goal: GoalInput,
    },
    /// Remove the goal at `row`
    Delete {
        /// Target row
        row: RowIndex,
    },
}

impl Mutation {
    /// Validate an add form into a create
    ///
    /// # Errors
    /// Returns the form's [`ValidationError`]
    pub fn create(draft: &GoalDraft) -> Result<Self, ValidationError> {
        Ok(Mutation::Create(draft.parse()?))
    }

    /// Validate an edit form into an update
    ///
    /// # Errors
    /// Returns the form's [`ValidationError`], or
    /// [`ValidationError::NotPersisted`] without a row
    pub fn update(edit: &GoalEdit) -> Result<Self, ValidationError> {
        let (row, goal) = edit.parse()?;
        Ok(Mutation::Update { row, goal })
    }

    /// Build a delete for a row
    ///
    /// # Errors
    /// Returns [`ValidationError::NotPersisted`] without a row
    pub fn delete(row: Option<&RowIndex>) -> Result<Self, ValidationError> {
        let row = row.cloned().ok_or(ValidationError::NotPersisted)?;
        Ok(Mutation::Delete { row })
    }

    /// Kind of write
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Row the write targets, if any
    #[inline]
    #[must_use]
    pub fn row(&self) -> Option<&RowIndex> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { row, .. } | Mutation::Delete { row } => Some(row),
        }
    }

    /// JSON body posted to the store
    ///
    /// - create: the goal fields
    /// - update: the goal fields plus `rowIndex`
    /// - delete: `{"action": "delete", "rowIndex": ..}`
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Mutation::Create(goal) => goal_fields(goal),
            Mutation::Update { row, goal } => {
                let mut body = goal_fields(goal);
                body["rowIndex"] = json!(row);
                body
            }
            Mutation::Delete { row } => json!({ "action": "delete", "rowIndex": row }),
        }
    }
}

fn goal_fields(goal: &GoalInput) -> Value {
    json!({
        "description": goal.description,
        "initialValue": goal.initial_value,
        "currentValue": goal.current_value,
        "endValue": goal.end_value,
        "category": goal.category,
        "units": goal.units.as_str(),
        "bgColor": goal.bg_color.to_string(),
    })
}
