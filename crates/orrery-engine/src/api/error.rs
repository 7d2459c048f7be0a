use thiserror::Error;
use crate::api::types::BodyId;

/// Setup-time failure. Building the body tree or loading configuration
/// aborts on the first one of these; nothing at tick time can fail.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("body {0:?} is not registered")]
    UnknownBody(BodyId),
    #[error("body {0:?} cannot be attached to itself")]
    SelfSatellite(BodyId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    SatelliteCycle { parent: BodyId, child: BodyId },
    #[error("body {child:?} already orbits {parent:?}")]
    AlreadyAttached { parent: BodyId, child: BodyId },
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { field: &'static str, value: f64 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} axis must have non-zero length")]
    ZeroAxis { field: &'static str },
    #[error("duplicate body id `{0}` in catalog")]
    DuplicateRecord(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check a length-like quantity (radius, distance).
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::NegativeOrNonFinite { field, value })
    }
}

/// Check a signed quantity (angular speed, tilt angle).
pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite { field, value })
    }
}

/// Normalize an axis, rejecting zero or non-finite vectors.
pub(crate) fn unit_axis(field: &'static str, axis: glam::Vec3) -> Result<glam::Vec3, ConfigurationError> {
    axis.try_normalize().ok_or(ConfigurationError::ZeroAxis { field })
}
