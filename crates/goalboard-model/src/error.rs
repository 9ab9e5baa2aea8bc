//! Error types for the goal model
//!
//! Two families:
//! - color parsing failures
//! - form validation failures (raised before anything touches the store)

use crate::form::Field;

/// Color parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// Input is not a `#rrggbb` string
    #[error("invalid color format: {0:?} (expected #rrggbb)")]
    InvalidColorFormat(String),
}

/// Form validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("missing required field: {0}")]
    MissingField(Field),

    /// A numeric field does not hold a number
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber {
        /// Offending field
        field: Field,
        /// Raw text as entered
        value: String,
    },

    /// Units outside the supported set
    #[error("unsupported units: {0:?}")]
    InvalidUnits(String),

    /// Background color is not `#rrggbb`
    #[error(transparent)]
    InvalidColor(#[from] ColorError),

    /// Update or delete of a goal the store has not assigned a row to
    #[error("goal has not been persisted yet")]
    NotPersisted,
}

impl ValidationError {
    /// Check if the error is a missing required field
    #[inline]
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    /// Field the error points at, if any
    #[inline]
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::MissingField(field) | Self::InvalidNumber { field, .. } => Some(*field),
            Self::InvalidUnits(_) => Some(Field::Units),
            Self::InvalidColor(_) => Some(Field::BgColor),
            Self::NotPersisted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::MissingField(Field::Category);
        assert_eq!(err.to_string(), "missing required field: category");

        let err = ValidationError::InvalidNumber {
            field: Field::EndValue,
            value: "ten".to_string(),
        };
        assert!(err.to_string().contains("endValue"));
    }

    #[test]
    fn validation_error_field() {
        assert_eq!(
            ValidationError::InvalidUnits("km".to_string()).field(),
            Some(Field::Units)
        );
        assert_eq!(ValidationError::NotPersisted.field(), None);
        assert!(ValidationError::MissingField(Field::Description).is_missing_field());
    }

    #[test]
    fn color_error_converts() {
        let err: ValidationError = ColorError::InvalidColorFormat("x".to_string()).into();
        assert_eq!(err.field(), Some(Field::BgColor));
    }
}
