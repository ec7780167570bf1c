//! Clamped volume level with debounced, best-effort writes to a sink.
//!
//! The level lives in [`VolumeState`]; [`VolumeController`] owns the
//! [`VolumeSink`] and only calls it when the level has moved by at least one
//! step since the last successful write.  Sink failures never escape: they
//! come back as [`ApplyOutcome::Failed`] and the next qualifying apply
//! retries.

use log::warn;
use thiserror::Error;

pub const MIN_VOLUME: i32 = 0;
pub const MAX_VOLUME: i32 = 100;

// ════════════════════════════════════════════════════════════════════════════
// VolumeSink — where the level ends up
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{program}` exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("volume level {0} outside 0.0–1.0")]
    OutOfRange(f32),
}

/// Anything that can push a normalized volume (0.0–1.0) to an output device.
pub trait VolumeSink {
    fn name(&self) -> &str;
    fn set_volume(&mut self, level: f32) -> Result<(), SinkError>;
}

impl<S: VolumeSink + ?Sized> VolumeSink for Box<S> {
    fn name(&self) -> &str { (**self).name() }
    fn set_volume(&mut self, level: f32) -> Result<(), SinkError> {
        (**self).set_volume(level)
    }
}

/// Accepts every level and does nothing.  Stands in when no audio backend
/// is reachable so the rest of the pipeline keeps running.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl VolumeSink for NullSink {
    fn name(&self) -> &str { "null" }
    fn set_volume(&mut self, _level: f32) -> Result<(), SinkError> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeState {
    current_volume:      i32,
    /// `None` until the first successful write.
    last_applied_volume: Option<i32>,
}

impl Default for VolumeState {
    fn default() -> Self { VolumeState::new(50) }
}

impl VolumeState {
    /// `initial` is clamped into [0, 100].
    pub fn new(initial: i32) -> Self {
        VolumeState {
            current_volume:      initial.clamp(MIN_VOLUME, MAX_VOLUME),
            last_applied_volume: None,
        }
    }

    pub fn current_volume(&self)      -> i32         { self.current_volume }
    pub fn last_applied_volume(&self) -> Option<i32> { self.last_applied_volume }

    fn needs_write(&self) -> bool {
        match self.last_applied_volume {
            None       => true,
            Some(last) => (self.current_volume - last).abs() >= 1,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeUpdate
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum ApplyOutcome {
    /// The sink accepted the new level.
    Applied,
    /// Level unchanged since the last write; the sink was not called.
    Unchanged,
    /// The sink was called and failed.  Logged, otherwise ignored.
    Failed(SinkError),
}

#[derive(Debug)]
pub struct VolumeUpdate {
    pub volume:  i32,
    pub outcome: ApplyOutcome,
}

impl VolumeUpdate {
    pub fn applied(&self) -> bool {
        matches!(self.outcome, ApplyOutcome::Applied)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeController
// ════════════════════════════════════════════════════════════════════════════

pub struct VolumeController<S: VolumeSink> {
    sink: S,
}

impl<S: VolumeSink> VolumeController<S> {
    pub fn new(sink: S) -> Self {
        VolumeController { sink }
    }

    pub fn sink(&self) -> &S { &self.sink }

    /// Shift the level by `delta` steps, then write it out if it moved.
    pub fn apply(&mut self, delta: i32, state: &mut VolumeState) -> VolumeUpdate {
        state.current_volume = state
            .current_volume
            .saturating_add(delta)
            .clamp(MIN_VOLUME, MAX_VOLUME);

        let volume = state.current_volume;
        if !state.needs_write() {
            return VolumeUpdate { volume, outcome: ApplyOutcome::Unchanged };
        }

        let outcome = match self.sink.set_volume(volume as f32 / 100.0) {
            Ok(()) => {
                state.last_applied_volume = Some(volume);
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!("failed to set volume to {}% via {}: {}", volume, self.sink.name(), e);
                ApplyOutcome::Failed(e)
            }
        };
        VolumeUpdate { volume, outcome }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
