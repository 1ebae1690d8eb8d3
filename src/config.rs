//! Machine configuration
//!
//! Supplied once when a machine is built. Every field has a default, so a
//! JSON document only needs the values it wants to override.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_MS;
use crate::error::ConfigError;

/// Machine sizes, speeds and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    // === Canvas ===
    pub width: f64,
    pub height: f64,

    // === Physics ===
    /// Added to every ball's vertical velocity each tick
    pub gravity: f64,
    /// Velocity factor on side and ceiling bounces
    pub friction: f64,
    /// Velocity factor on floor bounces
    pub ground_friction: f64,
    /// Default ball radius when a ball descriptor gives none
    pub ball_radius: f64,

    // === Claw shape ===
    /// Length unit of the arm polylines
    pub claw_size: f64,
    /// Arm thickness; also the gap between inner and outer arms
    pub claw_width: f64,
    /// How far the outer guides bulge past the inner arms vertically.
    /// `None` uses `claw_width * sqrt(3)`.
    pub outer_arm_flare: Option<f64>,

    // === Claw motion ===
    pub claw_start_x: f64,
    /// Idle (rest) height; the claw never rises above it
    pub claw_start_y: f64,
    pub claw_start_angle: f64,
    pub claw_speed_x: f64,
    pub claw_speed_y: f64,
    pub claw_open_speed: f64,

    // === Divider / chute ===
    /// Width of the chute to the right of the divider
    pub divider_width: f64,
    /// Height of the opening above the divider
    pub divider_height: f64,
    pub divider_thickness: f64,
    /// A ball this close to the floor past the divider counts as delivered
    pub drop_zone_margin: f64,

    // === Grab choreography ===
    /// The grab descends to `height - grab_depth_margin`
    pub grab_depth_margin: f64,
    /// Arm opening used while grabbing and when releasing over the chute
    pub grab_open_angle: f64,
    /// Release position is `width - chute_inset`
    pub chute_inset: f64,
    /// Pause over the chute before returning (ms)
    pub drop_delay_ms: f64,

    // === Timing ===
    /// Period of the manual drive timer (ms)
    pub manual_drive_interval_ms: f64,
    /// Duration of one frame (ms)
    pub frame_ms: f64,

    // === Presentation ===
    pub claw_color: String,
    pub claw_bolt_color: String,
    pub divider_fill_color: String,
    pub divider_border_color: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,

            gravity: 0.2,
            friction: 0.99,
            ground_friction: 0.8,
            ball_radius: 20.0,

            claw_size: 30.0,
            claw_width: 10.0,
            outer_arm_flare: None,

            claw_start_x: 200.0,
            claw_start_y: 40.0,
            claw_start_angle: 0.0,
            claw_speed_x: 2.0,
            claw_speed_y: 1.1,
            claw_open_speed: 1.0,

            divider_width: 70.0,
            divider_height: 140.0,
            divider_thickness: 20.0,
            drop_zone_margin: 50.0,

            grab_depth_margin: 50.0,
            grab_open_angle: 40.0,
            chute_inset: 30.0,
            drop_delay_ms: 500.0,

            manual_drive_interval_ms: 5.0,
            frame_ms: FRAME_MS,

            claw_color: "gray".to_string(),
            claw_bolt_color: "black".to_string(),
            divider_fill_color: "gray".to_string(),
            divider_border_color: "gray".to_string(),
        }
    }
}

impl MachineConfig {
    /// Parse a (possibly partial) JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded machine config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("claw_size", self.claw_size),
            ("claw_speed_x", self.claw_speed_x),
            ("claw_speed_y", self.claw_speed_y),
            ("claw_open_speed", self.claw_open_speed),
            ("manual_drive_interval_ms", self.manual_drive_interval_ms),
            ("frame_ms", self.frame_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    name,
                    value,
                    expected: "a finite value > 0",
                });
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("ground_friction", self.ground_friction),
            ("claw_width", self.claw_width),
            ("divider_thickness", self.divider_thickness),
            ("drop_delay_ms", self.drop_delay_ms),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    name,
                    value,
                    expected: "a finite value >= 0",
                });
            }
        }

        if let Some(flare) = self.outer_arm_flare.filter(|f| !f.is_finite()) {
            return Err(ConfigError::InvalidValue {
                name: "outer_arm_flare",
                value: flare,
                expected: "a finite value",
            });
        }

        if self.divider_width + self.divider_thickness >= self.width {
            return Err(ConfigError::InvalidValue {
                name: "divider_width",
                value: self.divider_width,
                expected: "divider_width + divider_thickness < width",
            });
        }
        if !(0.0..self.height).contains(&self.divider_height) {
            return Err(ConfigError::InvalidValue {
                name: "divider_height",
                value: self.divider_height,
                expected: "0 <= divider_height < height",
            });
        }
        if !(0.0..=self.height).contains(&self.claw_start_y) {
            return Err(ConfigError::InvalidValue {
                name: "claw_start_y",
                value: self.claw_start_y,
                expected: "0 <= claw_start_y <= height",
            });
        }

        Ok(())
    }

    /// Vertical bulge of the outer guides
    pub fn outer_arm_offset(&self) -> f64 {
        self.outer_arm_flare
            .unwrap_or(self.claw_width * 3.0_f64.sqrt())
    }

    /// Claw x where grabbed balls are released over the chute
    pub fn drop_position_x(&self) -> f64 {
        self.width - self.chute_inset
    }

    /// Claw x the grab sequence returns to (even pixel near mid-canvas)
    pub fn rest_position_x(&self) -> f64 {
        (self.width / 4.0).round() * 2.0
    }

    /// Depth the grab descends to
    pub fn grab_depth(&self) -> f64 {
        self.height - self.grab_depth_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drop_position_x(), 570.0);
        assert_eq!(config.rest_position_x(), 300.0);
        assert_eq!(config.grab_depth(), 350.0);
    }

    #[test]
    fn test_outer_arm_offset() {
        let config = MachineConfig::default();
        assert!((config.outer_arm_offset() - 300.0_f64.sqrt()).abs() < 1e-12);

        let tuned = MachineConfig {
            outer_arm_flare: Some(4.0),
            ..MachineConfig::default()
        };
        assert_eq!(tuned.outer_arm_offset(), 4.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = MachineConfig::from_json_str(r#"{ "width": 800, "gravity": 0.5 }"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.gravity, 0.5);
        assert_eq!(config.height, 400.0);
        assert_eq!(config.claw_color, "gray");
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = MachineConfig {
            claw_speed_x: 3.5,
            outer_arm_flare: Some(2.0),
            ..MachineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(MachineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        let err = MachineConfig::from_json_str("{ width: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = MachineConfig::from_json_str(r#"{ "claw_speed_y": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "claw_speed_y",
                ..
            }
        ));

        let divider_too_wide = MachineConfig {
            divider_width: 590.0,
            ..MachineConfig::default()
        };
        assert!(divider_too_wide.validate().is_err());

        let nan_gravity = MachineConfig {
            gravity: f64::NAN,
            ..MachineConfig::default()
        };
        assert!(nan_gravity.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = MachineConfig::load("/nonexistent/claw-machine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
