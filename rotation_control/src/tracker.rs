//! Wrap-aware rotation tracking.
//!
//! [`RotationTracker`] compares each new finger angle against the one seen on
//! the previous tracked frame and converts the shortest-path difference into
//! whole volume steps.
//!
//! ```text
//!   prev 350°  ──►  now 5°      raw  -345°
//!                               wrap  +15°   (small clockwise turn)
//!                               /8 →  +1 step
//! ```

use log::{debug, trace};

use crate::angle::Angle;
use crate::config::RotationConfig;

// ════════════════════════════════════════════════════════════════════════════
// RotationState
// ════════════════════════════════════════════════════════════════════════════

/// Per-session memory of the last tracked angle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    previous_angle: Option<Angle>,
    missed_frames:  u32,
}

impl RotationState {
    pub fn previous_angle(&self) -> Option<Angle> { self.previous_angle }
    pub fn missed_frames(&self)  -> u32           { self.missed_frames }
}

// ════════════════════════════════════════════════════════════════════════════
// RotationDelta / Direction
// ════════════════════════════════════════════════════════════════════════════

/// Result of one [`RotationTracker::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationDelta {
    /// Whole volume steps, truncated toward zero.
    pub volume_delta: i32,
    /// Wrap-corrected rotation in degrees, in (-180, 180].  Reported even
    /// when it is below the threshold.
    pub angle_delta:  f64,
}

impl RotationDelta {
    pub fn direction(&self) -> Direction {
        Direction::from_delta(self.volume_delta)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    pub fn from_delta(volume_delta: i32) -> Self {
        match volume_delta {
            d if d > 0 => Direction::Up,
            d if d < 0 => Direction::Down,
            _          => Direction::Neutral,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RotationTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default)]
pub struct RotationTracker {
    config: RotationConfig,
}

impl RotationTracker {
    pub fn new(config: RotationConfig) -> Self {
        RotationTracker { config }
    }

    pub fn config(&self) -> &RotationConfig { &self.config }

    /// Fold `current` into `state` and report how far the finger turned.
    ///
    /// `state.previous_angle` is set to `current` on every path.
    pub fn update(&self, current: Angle, state: &mut RotationState) -> RotationDelta {
        let delta = match state.previous_angle {
            None       => RotationDelta::default(),
            Some(prev) => self.delta_between(prev, current),
        };
        state.previous_angle = Some(current);
        state.missed_frames  = 0;
        trace!(
            "angle {:.1} → Δ{:+.2}° ({:+} steps)",
            current, delta.angle_delta, delta.volume_delta
        );
        delta
    }

    /// Record a frame without a hand.  Returns true if this call forgot the
    /// previous angle.
    pub fn miss(&self, state: &mut RotationState) -> bool {
        state.missed_frames = state.missed_frames.saturating_add(1);
        match self.config.reset_after_missed() {
            Some(limit) if state.missed_frames >= limit && state.previous_angle.is_some() => {
                debug!("hand lost for {} frames, forgetting previous angle", state.missed_frames);
                state.previous_angle = None;
                true
            }
            _ => false,
        }
    }

    fn delta_between(&self, prev: Angle, current: Angle) -> RotationDelta {
        let diff = shortest_arc(prev, current);
        let volume_delta = if diff.abs() >= self.config.angle_threshold() {
            (diff / self.config.rotation_sensitivity()).trunc() as i32
        } else {
            0
        };
        RotationDelta { volume_delta, angle_delta: diff }
    }
}

/// Signed `to - from` in degrees, folded into (-180, 180].
pub fn shortest_arc(from: Angle, to: Angle) -> f64 {
    let mut diff = to.degrees() - from.degrees();
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
