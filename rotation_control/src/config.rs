//! Tuning constants for the rotation → volume mapping.

use thiserror::Error;

/// Degrees of rotation per 1% volume step.
pub const DEFAULT_SENSITIVITY: f64 = 8.0;
/// Minimum per-frame rotation, in degrees, that counts as a rotation event.
pub const DEFAULT_THRESHOLD:   f64 = 3.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rotation sensitivity must be a positive number of degrees, got {0}")]
    Sensitivity(f64),

    #[error("angle threshold must be zero or more degrees, got {0}")]
    Threshold(f64),

    #[error("reset-after-missed must be at least 1 frame")]
    ResetAfterMissed,
}

/// Immutable once the session starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationConfig {
    rotation_sensitivity: f64,
    angle_threshold:      f64,
    /// Forget the previous angle after this many consecutive frames without
    /// a hand.  `None` keeps it forever.
    reset_after_missed:   Option<u32>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        RotationConfig {
            rotation_sensitivity: DEFAULT_SENSITIVITY,
            angle_threshold:      DEFAULT_THRESHOLD,
            reset_after_missed:   None,
        }
    }
}

impl RotationConfig {
    pub fn new(rotation_sensitivity: f64, angle_threshold: f64) -> Result<Self, ConfigError> {
        if !(rotation_sensitivity.is_finite() && rotation_sensitivity > 0.0) {
            return Err(ConfigError::Sensitivity(rotation_sensitivity));
        }
        if !(angle_threshold.is_finite() && angle_threshold >= 0.0) {
            return Err(ConfigError::Threshold(angle_threshold));
        }
        Ok(RotationConfig {
            rotation_sensitivity,
            angle_threshold,
            reset_after_missed: None,
        })
    }

    pub fn with_reset_after_missed(mut self, frames: Option<u32>) -> Result<Self, ConfigError> {
        if frames == Some(0) {
            return Err(ConfigError::ResetAfterMissed);
        }
        self.reset_after_missed = frames;
        Ok(self)
    }

    pub fn rotation_sensitivity(&self) -> f64 { self.rotation_sensitivity }
    pub fn angle_threshold(&self)      -> f64 { self.angle_threshold }
    pub fn reset_after_missed(&self)   -> Option<u32> { self.reset_after_missed }
}
