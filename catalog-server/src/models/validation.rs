//! Validation error types

use std::fmt;

/// Validation error for inbound product data
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric field must be strictly greater than zero
    NotPositive { field: &'static str },

    /// Integer parameter outside its accepted range
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// Value doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Required field was explicitly set to null.
    ///
    /// The field name comes from the store, so it is owned.
    Null { field: String },

    /// Request body or query string could not be parsed
    Malformed { reason: String },
}

impl ValidationError {
    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::NotPositive { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. } => Some(field),
            Self::Null { field } => Some(field),
            Self::Malformed { .. } => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NotPositive { field } => write!(f, "{} must be greater than 0", field),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Null { field } => {
                write!(f, "Required field '{}' cannot be null or empty", field)
            }
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "name exceeds maximum length of 100 characters"
        );

        let err = ValidationError::NotPositive { field: "price" };
        assert_eq!(err.to_string(), "price must be greater than 0");

        let err = ValidationError::Null {
            field: "name".into(),
        };
        assert_eq!(
            err.to_string(),
            "Required field 'name' cannot be null or empty"
        );
    }

    #[test]
    fn field_lookup() {
        assert_eq!(ValidationError::Empty { field: "name" }.field(), Some("name"));
        assert_eq!(
            ValidationError::Malformed {
                reason: "eof".into()
            }
            .field(),
            None
        );
    }
}
