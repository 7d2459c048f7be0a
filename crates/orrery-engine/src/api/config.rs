use serde::Deserialize;
use crate::api::error::ConfigurationError;
use crate::assets::units::UnitScale;
use crate::camera::director::CameraConfig;
use crate::core::body::SpinPolicy;
use crate::core::time::PlaybackConfig;

/// Top-level configuration for an [`Orrery`](crate::api::orrery::Orrery).
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f64,
    /// Capacity of the body section of the output buffer (default: 64).
    pub max_bodies: usize,
    /// Capacity of the helper-line section of the output buffer (default: 4096).
    pub max_helper_vertices: usize,
    /// Capacity of the event section of the output buffer (default: 16).
    pub max_events: usize,
    pub camera: CameraConfig,
    pub playback: PlaybackConfig,
    pub units: UnitScale,
    pub animation: AnimationConfig,
    pub spin_policy: SpinPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Global factor on every body's spin and revolution speed.
    pub time_scale: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_bodies: 64,
            max_helper_vertices: 4096,
            max_events: 16,
            camera: CameraConfig::default(),
            playback: PlaybackConfig::default(),
            units: UnitScale::default(),
            animation: AnimationConfig::default(),
            spin_policy: SpinPolicy::default(),
        }
    }
}

impl OrreryConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: OrreryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(invalid(format!("fixed_dt must be positive, got {}", self.fixed_dt)));
        }
        if self.max_bodies == 0 {
            return Err(invalid("max_bodies must be at least 1".to_string()));
        }
        if self.camera.transition_ticks == 0 {
            return Err(invalid("camera.transition_ticks must be at least 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.camera.alpha_floor) {
            return Err(invalid(format!(
                "camera.alpha_floor must be in [0, 1), got {}",
                self.camera.alpha_floor
            )));
        }
        let camera_values = [
            ("camera.arrival_threshold", self.camera.arrival_threshold),
            ("camera.offset_multiplier", self.camera.offset_multiplier),
            ("camera.offset_constant", self.camera.offset_constant),
            ("camera.nudge_distance", self.camera.nudge_distance),
            ("camera.height_floor", self.camera.height_floor),
            ("camera.easing_step", self.camera.easing_step),
        ];
        for (field, value) in camera_values {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{field} must be non-negative, got {value}")));
            }
        }
        if !(self.camera.max_overview_distance.is_finite() && self.camera.max_overview_distance > 0.0) {
            return Err(invalid(format!(
                "camera.max_overview_distance must be positive, got {}",
                self.camera.max_overview_distance
            )));
        }
        let min_time_scale = self.camera.min_time_scale;
        if !(min_time_scale > 0.0 && min_time_scale <= 1.0) {
            return Err(invalid(format!(
                "camera.min_time_scale must be in (0, 1], got {min_time_scale}"
            )));
        }
        if self.playback.floor_exponent > self.playback.ceiling_exponent {
            return Err(invalid(format!(
                "playback.floor_exponent {} exceeds ceiling_exponent {}",
                self.playback.floor_exponent, self.playback.ceiling_exponent
            )));
        }
        if !(self.playback.units_per_second.is_finite() && self.playback.units_per_second > 0.0) {
            return Err(invalid(format!(
                "playback.units_per_second must be positive, got {}",
                self.playback.units_per_second
            )));
        }
        if !self.animation.time_scale.is_finite() {
            return Err(invalid(format!(
                "animation.time_scale must be finite, got {}",
                self.animation.time_scale
            )));
        }
        self.units.validate()
    }
}

fn invalid(message: String) -> ConfigurationError {
    ConfigurationError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_defaults() {
        let config = OrreryConfig::from_json("{}").unwrap();
        assert!((config.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.camera.transition_ticks, 120);
        assert_eq!(config.playback.ceiling_exponent, 10);
        assert_eq!(config.animation.time_scale, 1.0);
        assert_eq!(config.spin_policy, SpinPolicy::Incremental);
    }

    #[test]
    fn nested_overrides() {
        let json = r#"{
            "camera": { "transition_ticks": 60, "blend": "sine_in_out" },
            "animation": { "time_scale": 0.5 },
            "spin_policy": "absolute"
        }"#;
        let config = OrreryConfig::from_json(json).unwrap();
        assert_eq!(config.camera.transition_ticks, 60);
        assert_eq!(config.camera.offset_multiplier, 4.75);
        assert_eq!(config.animation.time_scale, 0.5);
        assert_eq!(config.spin_policy, SpinPolicy::Absolute);
    }

    #[test]
    fn zero_transition_ticks_rejected() {
        let err = OrreryConfig::from_json(r#"{ "camera": { "transition_ticks": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("transition_ticks"));
    }

    #[test]
    fn stalled_glide_clock_rejected() {
        let err = OrreryConfig::from_json(r#"{ "camera": { "min_time_scale": 0.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("min_time_scale"));
    }

    #[test]
    fn non_positive_dt_rejected() {
        assert!(OrreryConfig::from_json(r#"{ "fixed_dt": 0.0 }"#).is_err());
        assert!(OrreryConfig::from_json(r#"{ "fixed_dt": -1.0 }"#).is_err());
    }

    #[test]
    fn inverted_multiplier_bounds_rejected() {
        let json = r#"{ "playback": { "floor_exponent": 4, "ceiling_exponent": 2 } }"#;
        assert!(OrreryConfig::from_json(json).is_err());
    }

    #[test]
    fn wrong_type_is_json_error() {
        assert!(matches!(
            OrreryConfig::from_json(r#"{ "max_bodies": "many" }"#),
            Err(ConfigurationError::Json(_))
        ));
    }
}
