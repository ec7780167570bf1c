//! Software-rendered window using `minifb`.
//!
//! The window shows each annotated frame as-is and doubles as the input
//! device for simulation mode: pointer movement and the `H` key are
//! forwarded to the [`SimLandmarkProvider`](crate::landmarks::SimLandmarkProvider)
//! as [`SimInput`] messages.  `Q` or closing the window ends the session.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use thiserror::Error;

use crate::frame::Frame;
use crate::landmarks::SimInput;

pub const WINDOW_TITLE: &str = "Volume Control - Finger Rotation";

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("could not open window: {0}")]
    Open(String),

    #[error("could not present frame: {0}")]
    Present(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Screen — where annotated frames go
// ════════════════════════════════════════════════════════════════════════════

pub trait Screen {
    /// Poll input; true once the user asked to quit.
    fn exit_requested(&mut self) -> bool;
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self, DisplayError> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| DisplayError::Open(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, sim_tx })
    }

    /// Forward pointer and key state to the simulator.
    /// Returns false when the window should close.
    fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return false;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }

        let pointer = match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) => SimInput::Pointer { x, y },
            None         => SimInput::PointerLost,
        };
        let _ = self.sim_tx.send(pointer);

        true
    }
}

impl Screen for Visualizer {
    fn exit_requested(&mut self) -> bool {
        !self.poll_input()
    }

    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| DisplayError::Present(e.to_string()))
    }
}
