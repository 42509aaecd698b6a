//! Range checks for user-supplied parameters.

use std::time::Duration;
use thiserror::Error;

/// Upper bound for any configured delay or lifetime.
pub const MAX_DURATION: Duration = Duration::from_secs(60 * 60);
/// Upper bound for particle counts.
pub const MAX_COUNT: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be at most {max:?}, got {value:?}")]
    TooLong {
        field: &'static str,
        value: Duration,
        max: Duration,
    },
    #[error("{field} must be at most {max}, got {value}")]
    TooMany {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NotFinite { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<(), ParamError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ParamError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn duration(field: &'static str, value: Duration) -> Result<(), ParamError> {
    if value > MAX_DURATION {
        return Err(ParamError::TooLong {
            field,
            value,
            max: MAX_DURATION,
        });
    }
    Ok(())
}

pub(crate) fn count(field: &'static str, value: usize) -> Result<(), ParamError> {
    if value > MAX_COUNT {
        return Err(ParamError::TooMany {
            field,
            value,
            max: MAX_COUNT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_rejects_nan_infinity_and_negatives() {
        assert!(non_negative("margin", 0.0).is_ok());
        assert!(non_negative("margin", 20.0).is_ok());
        assert!(matches!(
            non_negative("margin", f64::NAN),
            Err(ParamError::NotFinite { field: "margin", .. })
        ));
        assert!(non_negative("margin", f64::INFINITY).is_err());
        assert_eq!(
            non_negative("margin", -1.0),
            Err(ParamError::Negative {
                field: "margin",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_duration_limit_is_inclusive() {
        assert!(duration("settle_ms", MAX_DURATION).is_ok());
        assert!(duration("settle_ms", MAX_DURATION + Duration::from_millis(1)).is_err());
    }
}
