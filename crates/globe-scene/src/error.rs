//! Error types for scene construction.

use std::fmt;

/// Errors that can occur while building or driving a globe scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A configuration value is out of range, non-finite, or inconsistent.
    InvalidConfiguration {
        field: &'static str,
        detail: String,
    },
    /// The host has no accelerated rendering context.
    RenderingUnavailable { reason: String },
    /// A selection referenced an id that is not in the catalog.
    SelectionNotFound { id: String },
}

impl SceneError {
    pub(crate) fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, detail } => {
                write!(f, "invalid configuration for {field}: {detail}")
            }
            Self::RenderingUnavailable { reason } => {
                write!(f, "rendering unavailable: {reason}")
            }
            Self::SelectionNotFound { id } => {
                write!(f, "no service with id '{id}' in the catalog")
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Reject NaN and infinite values.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> SceneResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::invalid(field, format!("expected a finite value, got {value}")))
    }
}

/// Reject non-finite and negative values.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> SceneResult<f32> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(SceneError::invalid(
            field,
            format!("expected a non-negative value, got {value}"),
        ));
    }
    Ok(value)
}

/// Reject non-finite and non-positive values.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> SceneResult<f32> {
    let value = ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(SceneError::invalid(
            field,
            format!("expected a positive value, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_field() {
        let err = SceneError::invalid("icons.pool_size", "must be at most 256");
        assert_eq!(
            err.to_string(),
            "invalid configuration for icons.pool_size: must be at most 256"
        );
    }

    #[test]
    fn test_finite_checks() {
        assert!(ensure_finite("x", f32::NAN).is_err());
        assert!(ensure_finite("x", f32::INFINITY).is_err());
        assert!(ensure_non_negative("x", -0.5).is_err());
        assert_eq!(ensure_non_negative("x", 0.0), Ok(0.0));
        assert!(ensure_positive("x", 0.0).is_err());
        assert_eq!(ensure_positive("x", 1.5), Ok(1.5));
    }
}
