//! Render model for goal bars
//!
//! Everything a renderer needs to draw one goal, derived from the stored
//! record alone. No toolkit types leak in; colors stay [`HexColor`] and the
//! gradient is plain CSS text.

use crate::color::{HexColor, DEFAULT_DARKEN};
use crate::form::format_number;
use crate::goal::{Goal, RowIndex};
use crate::grouping::{group_by, Grouped};
use serde::Serialize;

/// Lightening step for the unfilled part of a bar
pub const TRACK_LIGHTEN: u8 = 40;

/// Darkening step for hover states on the goal color
pub const HOVER_DARKEN: u8 = 20;

/// Display form of a single goal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    /// Store key, used as the render key
    pub row_index: Option<RowIndex>,
    /// Category the bar is listed under
    pub category: String,
    /// Goal label
    pub description: String,
    /// `current/end units`
    pub caption: String,
    /// Clamped percentage
    pub progress: u8,
    /// Filled part of the bar
    pub fill: HexColor,
    /// Unfilled part of the bar
    pub track: HexColor,
    /// Text drawn over the bar
    pub text: HexColor,
    /// Color caption and edit icon
    pub accent: HexColor,
    /// Hover color for buttons painted in the goal color
    pub hover_accent: HexColor,
}

impl GoalView {
    /// CSS background for the bar
    #[must_use]
    pub fn gradient(&self) -> String {
        format!(
            "linear-gradient(to right, {fill} {p}%, {track} {p}%)",
            fill = self.fill,
            track = self.track,
            p = self.progress
        )
    }
}

impl From<&Goal> for GoalView {
    fn from(goal: &Goal) -> Self {
        let color = goal.bg_color;
        let current = goal.current_value.map(format_number).unwrap_or_default();
        let units = goal.units.map(|u| u.as_str()).unwrap_or_default();

        Self {
            row_index: goal.row_index.clone(),
            category: goal.category.clone(),
            description: goal.description.clone(),
            caption: format!("{current}/{} {units}", format_number(goal.end_value))
                .trim_end()
                .to_string(),
            progress: goal.progress(),
            fill: color,
            track: color.lighten(TRACK_LIGHTEN),
            text: color.contrast(),
            accent: color.darken(DEFAULT_DARKEN),
            hover_accent: color.darken(HOVER_DARKEN),
        }
    }
}

/// Goal views grouped for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    /// Columns keyed by category, in display order
    pub columns: Grouped<GoalView>,
}

impl Dashboard {
    /// Build the dashboard for a goal list
    #[must_use]
    pub fn new(goals: &[Goal]) -> Self {
        Self {
            columns: group_by(goals.iter().map(GoalView::from), |v| v.category.clone()),
        }
    }

    /// Number of goals on the board
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Whether the board has no goals
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
