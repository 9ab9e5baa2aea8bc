//! Goalboard Model
//!
//! The goal record and everything derived from it without I/O.
//!
//! # Overview
//!
//! - **Goal**: a tracked metric with baseline, current and target values
//! - **HexColor**: parsed `#rrggbb` color with contrast/lighten/darken
//! - **progress_percent**: clamped, total progress percentage
//! - **group_by_category**: stable partition into display columns
//! - **GoalDraft / GoalEdit**: raw form state and its parse step
//! - **GoalView / Dashboard**: render model for goal bars
//!
//! # Example
//!
//! ```rust
//! use goalboard_model::{Field, GoalDraft, group_by_category};
//!
//! let draft = GoalDraft::new()
//!     .with(Field::Description, "Run 100 miles")
//!     .with(Field::InitialValue, "0")
//!     .with(Field::CurrentValue, "25")
//!     .with(Field::EndValue, "100")
//!     .with(Field::Category, "Fitness")
//!     .with(Field::Units, "mi")
//!     .with(Field::BgColor, "#3366ff");
//!
//! let goal = draft.parse().unwrap().into_goal(None);
//! assert_eq!(goal.progress(), 25);
//!
//! let grouped = group_by_category(vec![goal]);
//! assert_eq!(grouped["Fitness"].len(), 1);
//! ```

#![warn(missing_docs)]

pub mod color;
pub mod error;
pub mod form;
pub mod goal;
pub mod grouping;
pub mod progress;
pub mod view;

// Re-exports
pub use color::{contrast_color, darken, lighten, HexColor, DEFAULT_DARKEN, DEFAULT_LIGHTEN};
pub use error::{ColorError, ValidationError};
pub use form::{format_number, Field, GoalDraft, GoalEdit, GoalInput};
pub use goal::{retain_displayable, unit_menu, Goal, RowIndex, UnitFamily, Units};
pub use grouping::{group_by, group_by_category, Grouped};
pub use progress::progress_percent;
pub use view::{Dashboard, GoalView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with goals
    pub use crate::{
        Dashboard, Field, Goal, GoalDraft, GoalEdit, GoalInput, GoalView, HexColor, RowIndex,
        Units, ValidationError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
