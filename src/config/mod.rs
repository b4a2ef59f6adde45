use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Tunable parameters of the collision prevention system.
///
/// Loaded once at startup, validated with [`CpsConfig::init`] and then shared
/// read-only (usually behind an `Arc`) by every CPS instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpsConfig {
    /// Separation margin (m) applied to vessels already flagged as dangerous.
    pub safe_distance: f64,
    /// Base time budget (s) before closest approach at which a correction is triggered.
    pub safe_time: f64,
    /// Upper bound (m/s) of every component of the applied correction.
    pub max_avoidance_speed: f64,
    /// Squared horizontal speed (m²/s²) above which proximity corrections go sideways.
    pub lat_avoid_min_vel_sqr: f64,
    /// Horizon (s) used to extrapolate relative velocity and altitude.
    pub look_ahead_time: f64,
    /// Traverse angle in degrees.
    pub traverse_angle: f64,
    /// Seconds without corrections after which the system fully stops.
    pub maneuver_timer: f64,
    pub vertical_maneuver_f: f64,
    /// Per-tick smoothing factor of the correction filter, in `(0, 1]`.
    pub low_pass_f: f64,
    #[serde(skip)]
    traverse_sin: f64,
}

/// Reasons a [`CpsConfig`] is rejected.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ConfigError {
    #[strum(to_string = "{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[strum(to_string = "{field} must lie in {range}, got {value}")]
    OutOfRange { field: &'static str, range: &'static str, value: f64 },
    #[strum(to_string = "failed to encode config: {reason}")]
    Encode { reason: String },
    #[strum(to_string = "failed to decode config: {reason}")]
    Decode { reason: String },
}

impl std::error::Error for ConfigError {}

impl Default for CpsConfig {
    fn default() -> Self {
        let mut cfg = Self {
            safe_distance: 30.0,
            safe_time: 5.0,
            max_avoidance_speed: 100.0,
            lat_avoid_min_vel_sqr: 0.25,
            look_ahead_time: 1.0,
            traverse_angle: 30.0,
            maneuver_timer: 3.0,
            vertical_maneuver_f: 0.5,
            low_pass_f: 0.5,
            traverse_sin: 0.0,
        };
        cfg.derive();
        cfg
    }
}

impl CpsConfig {
    /// Validates the parameters and computes the derived values.
    ///
    /// # Returns
    /// - `Ok(CpsConfig)` ready to be shared with the controllers.
    /// - `Err(ConfigError)` naming the first offending parameter.
    pub fn init(mut self) -> Result<Self, ConfigError> {
        self.validate()?;
        self.derive();
        Ok(self)
    }

    /// Sine of the traverse angle, derived from [`CpsConfig::traverse_angle`].
    pub fn traverse_sin(&self) -> f64 { self.traverse_sin }

    /// Checks every parameter without modifying the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("safe_distance", self.safe_distance),
            ("safe_time", self.safe_time),
            ("max_avoidance_speed", self.max_avoidance_speed),
            ("look_ahead_time", self.look_ahead_time),
            ("maneuver_timer", self.maneuver_timer),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.lat_avoid_min_vel_sqr.is_finite() && self.lat_avoid_min_vel_sqr >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "lat_avoid_min_vel_sqr",
                range: "[0, inf)",
                value: self.lat_avoid_min_vel_sqr,
            });
        }
        if !(self.low_pass_f > 0.0 && self.low_pass_f <= 1.0) {
            return Err(ConfigError::OutOfRange { field: "low_pass_f", range: "(0, 1]", value: self.low_pass_f });
        }
        if !(0.0..=1.0).contains(&self.vertical_maneuver_f) {
            return Err(ConfigError::OutOfRange {
                field: "vertical_maneuver_f",
                range: "[0, 1]",
                value: self.vertical_maneuver_f,
            });
        }
        if !(0.0..=90.0).contains(&self.traverse_angle) {
            return Err(ConfigError::OutOfRange {
                field: "traverse_angle",
                range: "[0, 90]",
                value: self.traverse_angle,
            });
        }
        Ok(())
    }

    /// Serializes the config into a compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ConfigError::Encode { reason: e.to_string() })
    }

    /// Restores a config from a snapshot produced by [`CpsConfig::to_bytes`].
    ///
    /// The decoded config is validated and its derived values recomputed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let (cfg, _): (Self, usize) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| ConfigError::Decode { reason: e.to_string() })?;
        cfg.init()
    }

    fn derive(&mut self) { self.traverse_sin = self.traverse_angle.to_radians().sin(); }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CpsConfig};

    #[test]
    fn test_defaults_are_valid() {
        let cfg = CpsConfig::default().init().unwrap();
        assert!((cfg.traverse_sin() - 0.5).abs() < 1e-9);
        assert!((cfg.safe_distance - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_filter_factor() {
        let cfg = CpsConfig { low_pass_f: 1.5, ..CpsConfig::default() };
        match cfg.init() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "low_pass_f"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_positive_timer() {
        let cfg = CpsConfig { maneuver_timer: 0.0, ..CpsConfig::default() };
        let err = cfg.init().unwrap_err();
        assert_eq!(err, ConfigError::NonPositive { field: "maneuver_timer", value: 0.0 });
        assert!(err.to_string().contains("maneuver_timer"));
    }

    #[test]
    fn test_snapshot_recomputes_derived_values() {
        let cfg = CpsConfig { traverse_angle: 90.0, safe_time: 7.5, ..CpsConfig::default() }.init().unwrap();
        let bytes = cfg.to_bytes().unwrap();
        let restored = CpsConfig::from_bytes(&bytes).unwrap();
        assert!((restored.traverse_sin() - 1.0).abs() < 1e-9);
        assert!((restored.safe_time - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_truncated_snapshot_fails() {
        let bytes = CpsConfig::default().to_bytes().unwrap();
        assert!(matches!(CpsConfig::from_bytes(&bytes[..3]), Err(ConfigError::Decode { .. })));
    }
}
