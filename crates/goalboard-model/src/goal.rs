//! Core goal types
//!
//! Defines the fundamental types of the dashboard:
//! - display units and their menu families
//! - the opaque store row key
//! - the goal record itself

use crate::color::HexColor;
use crate::progress::progress_percent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display units of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    /// Percentage
    #[serde(rename = "%")]
    Percent,
    /// Days
    #[serde(rename = "Days")]
    Days,
    /// Miles
    #[serde(rename = "mi")]
    Miles,
}

impl Units {
    /// Every supported unit, in menu order
    pub const ALL: [Units; 3] = [Units::Percent, Units::Days, Units::Miles];

    /// Stored string form
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Units::Percent => "%",
            Units::Days => "Days",
            Units::Miles => "mi",
        }
    }

    /// Menu family the unit is listed under
    #[inline]
    #[must_use]
    pub const fn family(&self) -> Option<UnitFamily> {
        match self {
            Units::Percent => None,
            Units::Days => Some(UnitFamily::Time),
            Units::Miles => Some(UnitFamily::Distance),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Presentation grouping of units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    /// Durations
    Time,
    /// Lengths
    Distance,
}

impl UnitFamily {
    /// Section header shown in the units menu
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            UnitFamily::Time => "Time",
            UnitFamily::Distance => "Distance",
        }
    }
}

/// Units menu sections in display order
///
/// Ungrouped units come first under a `None` header, then one section per
/// family in the order its first unit appears.
#[must_use]
pub fn unit_menu() -> Vec<(Option<UnitFamily>, Vec<Units>)> {
    let mut sections: Vec<(Option<UnitFamily>, Vec<Units>)> = Vec::new();
    for unit in Units::ALL {
        match sections.iter_mut().find(|(family, _)| *family == unit.family()) {
            Some((_, units)) => units.push(unit),
            None => sections.push((unit.family(), vec![unit])),
        }
    }
    sections
}

/// Opaque row key assigned by the store
///
/// Numeric for the spreadsheet store, but textual keys are carried through
/// untouched. Zero and empty text are never valid keys: the constructors
/// return `None` for them, so `Option<RowIndex>` doubles as the "persisted"
/// flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RowIndex {
    /// Numeric row
    Number(u64),
    /// Textual key
    Text(String),
}

impl RowIndex {
    /// Numeric key, `None` for zero
    #[inline]
    #[must_use]
    pub fn number(n: u64) -> Option<Self> {
        (n != 0).then_some(RowIndex::Number(n))
    }

    /// Key from text; digit-only text becomes numeric
    #[must_use]
    pub fn text(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<u64>() {
            Ok(n) => Self::number(n),
            Err(_) => Some(RowIndex::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIndex::Number(n) => write!(f, "{n}"),
            RowIndex::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RowIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::text(s).ok_or_else(|| format!("not a persisted row index: {s:?}"))
    }
}

/// A tracked goal as held in the displayed list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Free-text label
    pub description: String,
    /// Baseline value
    pub initial_value: f64,
    /// Latest measurement, if any
    pub current_value: Option<f64>,
    /// Target value
    pub end_value: f64,
    /// Grouping key
    pub category: String,
    /// Display units; `None` when the store holds something unrecognised
    pub units: Option<Units>,
    /// Bar color
    pub bg_color: HexColor,
    /// Store key; `None` until persisted
    pub row_index: Option<RowIndex>,
}

impl Goal {
    /// Create an unpersisted goal with no current value
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        initial_value: f64,
        end_value: f64,
    ) -> Self {
        Self {
            description: description.into(),
            initial_value,
            current_value: None,
            end_value,
            category: category.into(),
            units: None,
            bg_color: HexColor::default(),
            row_index: None,
        }
    }

    /// With current value
    #[inline]
    #[must_use]
    pub fn with_current(mut self, current: f64) -> Self {
        self.current_value = Some(current);
        self
    }

    /// With units
    #[inline]
    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    /// With bar color
    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: HexColor) -> Self {
        self.bg_color = color;
        self
    }

    /// With store key
    #[inline]
    #[must_use]
    pub fn with_row(mut self, row: RowIndex) -> Self {
        self.row_index = Some(row);
        self
    }

    /// Whether the store has assigned this goal a row
    #[inline]
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.row_index.is_some()
    }

    /// Progress in `[0, 100]`; a goal without a current value has none
    #[inline]
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.current_value.map_or(0, |current| {
            progress_percent(self.initial_value, current, self.end_value)
        })
    }

    /// Whether the goal passes the display filter
    ///
    /// `end_value` is always defined on a decoded goal, so only the two text
    /// fields can fail.
    #[inline]
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.description.is_empty() && !self.category.is_empty()
    }
}

/// Keep only goals that pass [`Goal::is_displayable`], in order
#[must_use]
pub fn retain_displayable(goals: Vec<Goal>) -> Vec<Goal> {
    goals.into_iter().filter(Goal::is_displayable).collect()
}
