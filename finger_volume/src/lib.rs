//! # finger_volume
//!
//! Index-finger rotation volume control with live on-frame feedback.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Rotate index finger clockwise | Volume up, one step per `sensitivity` degrees |
//! | Rotate index finger counter-clockwise | Volume down |
//! | Turn smaller than `threshold` degrees | Nothing (angle still shown) |
//! | Hand out of view | "No hand" notice; last angle is kept |
//!
//! ## Visualization
//!
//! Each frame is mirrored, annotated with a tiered volume bar (red below
//! 33%, yellow below 66%, green above), the current finger angle and the
//! rotation direction, and shown in a `minifb` window.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse pointer is the fingertip,
//!   the finger base is fixed near the centre of the window.
//! * `leap` — **Hardware mode**: index-finger joints come from a LeapMotion
//!   controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Move pointer | Move the fingertip |
//! | Pointer leaves window | Hand lost |
//! | `H` | Hide / show the hand |
//! | `Q` | Quit |

pub mod frame;
pub mod landmarks;
pub mod sink;
pub mod feedback;
pub mod visualizer;
pub mod app;
