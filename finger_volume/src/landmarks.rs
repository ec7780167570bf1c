//! Hand-landmark providers — from LeapMotion hardware or pointer simulation.
//!
//! The public interface is [`LandmarkProvider`]: given the current frame it
//! returns the index finger's base and tip, or `None` when no hand is in
//! view.  The frame loop doesn't need to know whether the points came from
//! real hardware or the mouse.

use std::sync::mpsc::{Receiver, TryRecvError};

use log::debug;
use rotation_control::Point2D;

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// A point normalized to the frame: (0, 0) top-left, (1, 1) bottom-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub fn new(x: f32, y: f32) -> Self {
        NormPoint { x, y }
    }

    pub fn to_pixel(self, width: usize, height: usize) -> Point2D {
        Point2D::from_normalized(self.x, self.y, width, height)
    }
}

/// The two landmarks the volume control needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks {
    /// Knuckle where the index finger meets the palm (landmark 5).
    pub index_base: NormPoint,
    /// Index fingertip (landmark 8).
    pub index_tip:  NormPoint,
}

impl HandLandmarks {
    /// Base and tip in pixel coordinates of a `width × height` frame.
    pub fn to_pixels(&self, width: usize, height: usize) -> (Point2D, Point2D) {
        (self.index_base.to_pixel(width, height), self.index_tip.to_pixel(width, height))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkProvider trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

pub trait LandmarkProvider {
    /// Short label for startup logging.
    fn name(&self) -> &str;
    /// Landmarks of the single tracked hand in `frame`, if any.
    fn detect(&mut self, frame: &Frame) -> Option<HandLandmarks>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkProvider — mouse pointer simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in frame pixels.
    Pointer { x: f32, y: f32 },
    /// Pointer left the window.
    PointerLost,
    /// `H` pressed: show / hide the simulated hand.
    ToggleHand,
}

/// Landmark source driven by [`SimInput`] events from the visualizer window.
///
/// The finger base sits at a fixed anchor; the fingertip follows the
/// pointer.  Circling the pointer around the anchor turns the "finger".
pub struct SimLandmarkProvider {
    rx:      Receiver<SimInput>,
    anchor:  NormPoint,
    pointer: Option<(f32, f32)>,
    visible: bool,
}

impl SimLandmarkProvider {
    pub fn new(rx: Receiver<SimInput>, anchor: NormPoint) -> Self {
        SimLandmarkProvider { rx, anchor, pointer: None, visible: true }
    }

    /// Apply every queued input; never blocks.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer { x, y }) => self.pointer = Some((x, y)),
                Ok(SimInput::PointerLost)      => self.pointer = None,
                Ok(SimInput::ToggleHand)       => {
                    self.visible = !self.visible;
                    debug!("simulated hand {}", if self.visible { "shown" } else { "hidden" });
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl LandmarkProvider for SimLandmarkProvider {
    fn name(&self) -> &str { "pointer simulation" }

    fn detect(&mut self, frame: &Frame) -> Option<HandLandmarks> {
        self.drain();
        if !self.visible {
            return None;
        }
        let (px, py) = self.pointer?;
        let w = frame.width.max(1) as f32;
        let h = frame.height.max(1) as f32;
        Some(HandLandmarks {
            index_base: self.anchor,
            index_tip:  NormPoint::new((px / w).clamp(0.0, 1.0), (py / h).clamp(0.0, 1.0)),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkProvider — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("hand tracker unavailable: {0}")]
    Device(String),
}

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The index finger's metacarpal head (base) and distal tip are projected
/// onto the device's x/y plane and normalized against a fixed interaction
/// box, so the frame shows the hand as if the camera faced the user.
#[cfg(feature = "leap")]
pub struct LeapLandmarkProvider {
    connection: leaprs::Connection,
    last:       Option<HandLandmarks>,
}

#[cfg(feature = "leap")]
impl LeapLandmarkProvider {
    // Interaction box above the device, in mm
    const X_RANGE:    (f32, f32) = (-200.0, 200.0);
    const Y_RANGE:    (f32, f32) = (80.0, 480.0);
    const POLL_MS:    u32        = 10;

    pub fn open() -> Result<Self, LandmarkError> {
        use leaprs::{Connection, ConnectionConfig};

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| LandmarkError::Device(format!("{:?}", e)))?;
        connection
            .open()
            .map_err(|e| LandmarkError::Device(format!("{:?}", e)))?;
        log::info!("LeapMotion connection opened");
        Ok(LeapLandmarkProvider { connection, last: None })
    }

    fn normalize(x: f32, y: f32) -> NormPoint {
        let nx = (x - Self::X_RANGE.0) / (Self::X_RANGE.1 - Self::X_RANGE.0);
        // Device y points up, frame y points down
        let ny = 1.0 - (y - Self::Y_RANGE.0) / (Self::Y_RANGE.1 - Self::Y_RANGE.0);
        NormPoint::new(nx.clamp(0.0, 1.0), ny.clamp(0.0, 1.0))
    }

    fn index_landmarks(hand: &leaprs::Hand) -> Option<HandLandmarks> {
        let fingers: Vec<_> = hand.digits().collect();
        let index = fingers.get(1)?;
        let base  = index.metacarpal().next_joint();
        let tip   = index.distal().next_joint();
        Some(HandLandmarks {
            index_base: Self::normalize(base.x, base.y),
            index_tip:  Self::normalize(tip.x, tip.y),
        })
    }
}

#[cfg(feature = "leap")]
impl LandmarkProvider for LeapLandmarkProvider {
    fn name(&self) -> &str { "LeapMotion" }

    fn detect(&mut self, _frame: &Frame) -> Option<HandLandmarks> {
        use leaprs::Event;

        // Tracking frames arrive faster than we render; keep the latest and
        // reuse it when a poll times out.
        if let Ok(msg) = self.connection.poll(Self::POLL_MS) {
            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                self.last = hands.first().and_then(|h| Self::index_landmarks(h));
            }
        }
        self.last
    }
}

#[cfg(feature = "leap")]
impl Drop for LeapLandmarkProvider {
    fn drop(&mut self) {
        log::info!("LeapMotion connection released");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
