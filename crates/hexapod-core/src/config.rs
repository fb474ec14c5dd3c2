use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HexapodError};
use crate::types::{BodyDimensions, GaitLimits, GaitParameters, LegLengths};

// ---------------------------------------------------------------------------
// HexapodConfig
// ---------------------------------------------------------------------------

/// Startup configuration for a hexapod engine instance.
///
/// Every section, and every field within a section, is optional in the TOML
/// file and falls back to the engine defaults.
///
/// ```toml
/// [dimensions]
/// front = 4.0
/// middle = 6.0
/// side = 6.0
///
/// [gait]
/// hip_swing = 20.0
/// gait_type = "ripple"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HexapodConfig {
    #[serde(default)]
    pub dimensions: BodyDimensions,

    #[serde(default)]
    pub leg_lengths: LegLengths,

    #[serde(default)]
    pub gait: GaitParameters,

    #[serde(default)]
    pub limits: GaitLimits,
}

impl HexapodConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [lo, hi] = self.limits.hip_swing;
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(invalid("limits.hip_swing", format!("min {lo} > max {hi}")));
        }
        let [lo, hi] = self.limits.lift_swing;
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(invalid("limits.lift_swing", format!("min {lo} > max {hi}")));
        }
        if self.limits.max_speed.is_nan() || self.limits.max_speed <= 0.0 {
            return Err(invalid("limits.max_speed", "must be > 0".into()));
        }
        self.dimensions
            .validate()
            .map_err(|e| nested("dimensions", e))?;
        self.leg_lengths
            .validate()
            .map_err(|e| nested("leg_lengths", e))?;
        self.gait
            .validate(&self.limits)
            .map_err(|e| nested("gait", e))?;
        Ok(())
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message,
    }
}

fn nested(section: &str, err: HexapodError) -> ConfigError {
    match err {
        HexapodError::Config(inner) => inner,
        other => invalid(section, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::{Direction, GaitType};

    #[test]
    fn default_config_is_valid() {
        assert!(HexapodConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = HexapodConfig::from_toml_str("").unwrap();
        assert_eq!(config, HexapodConfig::default());
    }

    #[test]
    fn partial_toml_overrides_sections() {
        let config = HexapodConfig::from_toml_str(
            r#"
            [leg_lengths]
            coxa = 2.0
            femur = 6.0
            tibia = 8.0

            [gait]
            hip_swing = 20.0
            lift_swing = 2.5
            step_num = 5
            speed = 5.0
            gait_type = "ripple"
            direction = "backward"
            rotate_in_place = true
            "#,
        )
        .unwrap();
        assert_eq!(config.leg_lengths.femur, 6.0);
        assert_eq!(config.gait.gait_type, GaitType::Ripple);
        assert_eq!(config.gait.direction, Direction::Backward);
        assert!(config.gait.rotate_in_place);
        assert_eq!(config.dimensions, BodyDimensions::default());
    }

    #[test]
    fn out_of_range_dimension_is_rejected() {
        let err = HexapodConfig::from_toml_str(
            r#"
            [dimensions]
            front = 25.0
            middle = 6.0
            side = 6.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "dimensions"));
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let err = HexapodConfig::from_toml_str(
            r#"
            [limits]
            hip_swing = [40.0, 10.0]
            lift_swing = [1.0, 10.0]
            max_speed = 20.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("limits.hip_swing"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = HexapodConfig::from_toml_str("[gait\nhip_swing = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gait]\nhip_swing = 15.0\nlift_swing = 2.0\nstep_num = 8\nspeed = 4.0\ngait_type = \"tripod\"\ndirection = \"forward\"\nrotate_in_place = false").unwrap();
        let config = HexapodConfig::from_file(file.path()).unwrap();
        assert_eq!(config.gait.step_num, 8);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = HexapodConfig::from_file("/nonexistent/hexapod.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
