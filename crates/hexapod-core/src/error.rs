use thiserror::Error;

use crate::types::LegId;

/// Top-level error type for the hexapod engine.
#[derive(Debug, Error)]
pub enum HexapodError {
    #[error("Invalid dimension {field}: {value} (must be within [{min}, {max}])")]
    InvalidDimension {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid gait parameters: {0}")]
    InvalidGaitParameters(String),

    #[error("IK target unreachable for leg {leg}: distance {distance:.4} clamped to {bound:.4}")]
    IkUnreachable {
        leg: LegId,
        distance: f64,
        bound: f64,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Clamped single-leg IK target.
///
/// Reported alongside a best-effort solution rather than returned as an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkUnreachable {
    pub leg: LegId,
    /// Planar femur-joint-to-foot distance requested.
    pub distance: f64,
    /// Bound of the reachable annulus the distance was clamped to.
    pub bound: f64,
}

impl From<IkUnreachable> for HexapodError {
    fn from(u: IkUnreachable) -> Self {
        Self::IkUnreachable {
            leg: u.leg,
            distance: u.distance,
            bound: u.bound,
        }
    }
}

/// Reject non-finite values with [`HexapodError::MalformedInput`].
pub fn ensure_finite(name: &str, values: &[f64]) -> Result<(), HexapodError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(HexapodError::MalformedInput(format!(
            "{name} contains a non-finite value: {values:?}"
        )))
    }
}
