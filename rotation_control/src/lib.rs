//! # rotation_control
//!
//! Turns the orientation of an index finger into a clamped 0–100 volume
//! level.
//!
//! | Stage | Type | Input → Output |
//! |---|---|---|
//! | Estimate | [`AngleEstimator`] | finger base + tip → [`Angle`] in [0, 360) |
//! | Track | [`RotationTracker`] | angle + [`RotationState`] → [`RotationDelta`] |
//! | Control | [`VolumeController`] | volume delta + [`VolumeState`] → [`VolumeUpdate`] |
//!
//! Nothing here talks to a camera, a window, or the OS mixer directly.  The
//! mixer is reached through the [`VolumeSink`] trait, which callers
//! implement for their backend.
//!
//! ## Quick start
//!
//! ```rust
//! use rotation_control::{
//!     AngleEstimator, Point2D, RotationConfig, RotationState, RotationTracker,
//!     NullSink, VolumeController, VolumeState,
//! };
//!
//! let tracker        = RotationTracker::new(RotationConfig::default());
//! let mut controller = VolumeController::new(NullSink);
//! let mut rotation   = RotationState::default();
//! let mut volume     = VolumeState::new(50);
//!
//! let base = Point2D::new(100, 100);
//! for tip in [Point2D::new(150, 100), Point2D::new(100, 150)] {
//!     let angle = AngleEstimator::estimate(base, tip).unwrap();
//!     let delta = tracker.update(angle, &mut rotation);
//!     controller.apply(delta.volume_delta, &mut volume);
//! }
//! assert_eq!(volume.current_volume(), 61);
//! ```

pub mod angle;
pub mod config;
pub mod tracker;
pub mod volume;

pub use angle::{Angle, AngleEstimator, Point2D};
pub use config::{ConfigError, RotationConfig};
pub use tracker::{Direction, RotationDelta, RotationState, RotationTracker};
pub use volume::{
    ApplyOutcome, NullSink, SinkError, VolumeController, VolumeSink, VolumeState, VolumeUpdate,
    MAX_VOLUME, MIN_VOLUME,
};
