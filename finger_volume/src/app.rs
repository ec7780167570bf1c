//! The frame loop.
//!
//! `FrameLoop` owns the frame source, the landmark provider, the volume
//! controller (and through it the sink), and the screen.  Each iteration:
//!
//! 1. stop if the user asked to quit
//! 2. pull a frame (stop when the source runs dry)
//! 3. mirror it, detect the hand
//! 4. angle → rotation delta → volume
//! 5. render feedback and show it
//!
//! Everything runs on the calling thread; the state structs are mutated in
//! one place per iteration.

use std::fmt;
use std::sync::mpsc;

use log::{debug, info, trace};
use rotation_control::{
    Angle, AngleEstimator, ApplyOutcome, NullSink, RotationConfig, RotationDelta, RotationState,
    RotationTracker, VolumeController, VolumeSink, VolumeState,
};
use thiserror::Error;

use crate::feedback::{FeedbackRenderer, FeedbackView, TrackingView};
use crate::frame::{Frame, FrameSource, SyntheticCamera};
use crate::landmarks::{LandmarkError, LandmarkProvider, NormPoint};
use crate::sink::open_system_sink;
use crate::visualizer::{DisplayError, Screen, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub rotation:       RotationConfig,
    pub initial_volume: i32,
    pub width:          usize,
    pub height:         usize,
    /// Flip frames horizontally before detection, like a mirror.
    pub mirror:         bool,
    /// Probe for a system mixer; `false` forces the null sink.
    pub audio:          bool,
    /// Stop after this many frames (`None` = until quit).
    pub max_frames:     Option<u64>,
    /// Where the simulated finger base sits, normalized.
    pub sim_anchor:     NormPoint,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            rotation:       RotationConfig::default(),
            initial_volume: 50,
            width:          1280,
            height:         720,
            mirror:         true,
            audio:          true,
            max_frames:     None,
            sim_anchor:     NormPoint::new(0.5, 0.55),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session results
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Landmarks(#[from] LandmarkError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Quit key or window closed.
    UserExit,
    /// The frame source had nothing more.
    SourceExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames:           u64,
    pub frames_with_hand: u64,
    pub applies:          u64,
    pub failed_applies:   u64,
    pub final_volume:     i32,
    pub stop_reason:      StopReason,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.stop_reason {
            StopReason::UserExit        => "closed by user",
            StopReason::SourceExhausted => "frame source exhausted",
        };
        write!(
            f,
            "{} frames ({} with a hand), {} volume writes, {} failed, final volume {}% — {}",
            self.frames, self.frames_with_hand, self.applies, self.failed_applies,
            self.final_volume, reason
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameLoop
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameLoop<F, P, S, D>
where
    F: FrameSource,
    P: LandmarkProvider,
    S: VolumeSink,
    D: Screen,
{
    source:     F,
    provider:   P,
    controller: VolumeController<S>,
    screen:     D,
    tracker:    RotationTracker,
    rotation:   RotationState,
    volume:     VolumeState,
    mirror:     bool,

    frames:           u64,
    frames_with_hand: u64,
    applies:          u64,
    failed_applies:   u64,
}

impl<F, P, S, D> FrameLoop<F, P, S, D>
where
    F: FrameSource,
    P: LandmarkProvider,
    S: VolumeSink,
    D: Screen,
{
    pub fn new(cfg: &AppConfig, source: F, provider: P, sink: S, screen: D) -> Self {
        FrameLoop {
            source,
            provider,
            controller: VolumeController::new(sink),
            screen,
            tracker:    RotationTracker::new(cfg.rotation),
            rotation:   RotationState::default(),
            volume:     VolumeState::new(cfg.initial_volume),
            mirror:     cfg.mirror,
            frames:           0,
            frames_with_hand: 0,
            applies:          0,
            failed_applies:   0,
        }
    }

    pub fn volume_state(&self)   -> &VolumeState   { &self.volume }
    pub fn rotation_state(&self) -> &RotationState { &self.rotation }

    /// Run until quit or until the source is exhausted.
    pub fn run(&mut self) -> Result<SessionSummary, LoopError> {
        let stop_reason = loop {
            if self.screen.exit_requested() {
                break StopReason::UserExit;
            }
            let raw = match self.source.next_frame() {
                Some(f) => f,
                None    => break StopReason::SourceExhausted,
            };
            let frame = if self.mirror { raw.mirrored() } else { raw };
            let annotated = self.process(&frame);
            self.screen.show(&annotated)?;
        };
        info!("session ended: {:?}", stop_reason);
        Ok(self.summary(stop_reason))
    }

    /// Detect, track, control and render one (already mirrored) frame.
    pub fn process(&mut self, frame: &Frame) -> Frame {
        self.frames += 1;

        let view = match self.provider.detect(frame) {
            None => {
                self.tracker.miss(&mut self.rotation);
                FeedbackView::NoHand
            }
            Some(hand) => {
                self.frames_with_hand += 1;
                let (base, tip) = hand.to_pixels(frame.width, frame.height);
                // base == tip: reuse the last angle; with none yet, leave the
                // state unset so the next real reading becomes the reference
                let (angle, delta) = match AngleEstimator::estimate(base, tip)
                    .or(self.rotation.previous_angle())
                {
                    Some(angle) => (angle, self.tracker.update(angle, &mut self.rotation)),
                    None        => (Angle::ZERO, RotationDelta::default()),
                };
                let update = self.controller.apply(delta.volume_delta, &mut self.volume);
                match update.outcome {
                    ApplyOutcome::Applied   => {
                        self.applies += 1;
                        debug!("volume → {}%", update.volume);
                    }
                    ApplyOutcome::Failed(_) => self.failed_applies += 1,
                    ApplyOutcome::Unchanged => {}
                }
                trace!("frame {}: {:?} {:?}", self.frames, delta, update.outcome);
                FeedbackView::Tracking(TrackingView {
                    volume:    update.volume,
                    angle,
                    direction: delta.direction(),
                    base,
                    tip,
                })
            }
        };

        FeedbackRenderer::render(frame, &view)
    }

    fn summary(&self, stop_reason: StopReason) -> SessionSummary {
        SessionSummary {
            frames:           self.frames,
            frames_with_hand: self.frames_with_hand,
            applies:          self.applies,
            failed_applies:   self.failed_applies,
            final_volume:     self.volume.current_volume(),
            stop_reason,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the application entry point
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the window, picks the sink (system mixer unless audio is disabled)
/// and the landmark provider (pointer simulation by default, LeapMotion with
/// `--features leap`), then drives the frame loop.  Every resource is owned
/// by the loop and released when this function returns, on every path.
pub fn run(cfg: AppConfig) -> Result<SessionSummary, LoopError> {
    let (sim_tx, sim_rx) = mpsc::channel();
    let screen = Visualizer::new(cfg.width, cfg.height, sim_tx)?;

    let sink: Box<dyn VolumeSink> = if cfg.audio {
        open_system_sink()
    } else {
        info!("[sink] audio disabled — using null sink");
        Box::new(NullSink)
    };

    let camera = SyntheticCamera::new(cfg.width, cfg.height).with_limit(cfg.max_frames);

    #[cfg(feature = "leap")]
    let provider = {
        drop(sim_rx);
        crate::landmarks::LeapLandmarkProvider::open()?
    };
    #[cfg(not(feature = "leap"))]
    let provider = crate::landmarks::SimLandmarkProvider::new(sim_rx, cfg.sim_anchor);

    info!("landmarks: {}  sink: {}", provider.name(), sink.name());

    let mut frame_loop = FrameLoop::new(&cfg, camera, provider, sink, screen);
    frame_loop.run()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HandLandmarks;
    use rotation_control::SinkError;
    use std::collections::VecDeque;

    // ── test doubles ──────────────────────────────────────────────────────

    /// Replays a fixed script of detections, one per frame.
    struct ScriptedProvider {
        script: VecDeque<Option<HandLandmarks>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Option<HandLandmarks>>) -> Self {
            ScriptedProvider { script: script.into() }
        }
    }

    impl LandmarkProvider for ScriptedProvider {
        fn name(&self) -> &str { "scripted" }
        fn detect(&mut self, _frame: &Frame) -> Option<HandLandmarks> {
            self.script.pop_front().flatten()
        }
    }

    /// Accepts frames, keeping the last one; asks to quit after
    /// `quit_after` shows.
    struct HeadlessScreen {
        shown:      usize,
        last:       Option<Frame>,
        quit_after: Option<usize>,
        fail:       bool,
    }

    impl HeadlessScreen {
        fn new() -> Self {
            HeadlessScreen { shown: 0, last: None, quit_after: None, fail: false }
        }
    }

    impl Screen for HeadlessScreen {
        fn exit_requested(&mut self) -> bool {
            self.quit_after.map_or(false, |n| self.shown >= n)
        }
        fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Present("headless".into()));
            }
            self.shown += 1;
            self.last = Some(frame.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        calls: usize,
        fail:  bool,
    }

    impl VolumeSink for CountingSink {
        fn name(&self) -> &str { "counting" }
        fn set_volume(&mut self, _level: f32) -> Result<(), SinkError> {
            self.calls += 1;
            if self.fail {
                Err(SinkError::OutOfRange(2.0))
            } else {
                Ok(())
            }
        }
    }

    /// One black 400×400 frame with a single marked pixel.
    struct MarkedSource {
        mark: Option<(i32, i32)>,
    }

    impl FrameSource for MarkedSource {
        fn next_frame(&mut self) -> Option<Frame> {
            let (x, y) = self.mark.take()?;
            let mut f = Frame::new(400, 400, BLACK);
            f.set_pixel(x, y, MARK);
            Some(f)
        }
    }

    const BLACK: u32 = 0xFF00_0000;
    const MARK:  u32 = 0xFF12_3456;

    // ── helpers ───────────────────────────────────────────────────────────

    /// 400×400 frame, so quarter steps land on exact pixels.
    fn cfg() -> AppConfig {
        AppConfig {
            width:  400,
            height: 400,
            mirror: false,
            audio:  false,
            ..AppConfig::default()
        }
    }

    fn hand(base: (f32, f32), tip: (f32, f32)) -> Option<HandLandmarks> {
        Some(HandLandmarks {
            index_base: NormPoint::new(base.0, base.1),
            index_tip:  NormPoint::new(tip.0, tip.1),
        })
    }

    fn camera(n: u64) -> SyntheticCamera {
        SyntheticCamera::new(400, 400).with_limit(Some(n))
    }

    // ── tests ─────────────────────────────────────────────────────────────

    #[test]
    fn quarter_turn_raises_volume_by_eleven() {
        // base (100,100); tip (150,100) → 0°, then (100,150) → 90°
        let script = vec![
            hand((0.25, 0.25), (0.375, 0.25)),
            hand((0.25, 0.25), (0.25, 0.375)),
        ];
        let mut fl = FrameLoop::new(
            &cfg(), camera(2), ScriptedProvider::new(script), CountingSink::default(), HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.final_volume, 61);
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.frames_with_hand, 2);
        assert_eq!(summary.applies, 2);
        assert_eq!(summary.stop_reason, StopReason::SourceExhausted);
        assert_eq!(fl.rotation_state().previous_angle(), Some(Angle::from_degrees(90.0)));
    }

    #[test]
    fn steady_finger_writes_once() {
        let script = vec![hand((0.5, 0.5), (0.75, 0.5)); 10];
        let mut fl = FrameLoop::new(
            &cfg(), camera(10), ScriptedProvider::new(script), CountingSink::default(), HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.applies, 1);
        assert_eq!(fl.controller.sink().calls, 1);
        assert_eq!(summary.final_volume, 50);
    }

    #[test]
    fn gaps_do_not_reset_previous_angle() {
        let script = vec![
            hand((0.5, 0.5), (0.75, 0.5)),   // 0°
            None,
            None,
            hand((0.5, 0.5), (0.5, 0.75)),   // 90°, compared against 0°
        ];
        let mut fl = FrameLoop::new(
            &cfg(), camera(4), ScriptedProvider::new(script), NullSink, HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.frames_with_hand, 2);
        assert_eq!(summary.final_volume, 61);
    }

    #[test]
    fn gaps_reset_previous_angle_when_configured() {
        let mut c = cfg();
        c.rotation = RotationConfig::default().with_reset_after_missed(Some(2)).unwrap();
        let script = vec![
            hand((0.5, 0.5), (0.75, 0.5)),
            None,
            None,
            hand((0.5, 0.5), (0.5, 0.75)),
        ];
        let mut fl = FrameLoop::new(
            &c, camera(4), ScriptedProvider::new(script), NullSink, HeadlessScreen::new(),
        );
        assert_eq!(fl.run().unwrap().final_volume, 50);
    }

    #[test]
    fn coincident_points_reuse_previous_angle() {
        let script = vec![
            hand((0.5, 0.5), (0.5, 0.75)),   // 90°
            hand((0.5, 0.5), (0.5, 0.5)),    // degenerate
            hand((0.5, 0.5), (0.5, 0.75)),   // 90° again
        ];
        let mut fl = FrameLoop::new(
            &cfg(), camera(3), ScriptedProvider::new(script), NullSink, HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.final_volume, 50);
        assert_eq!(fl.rotation_state().previous_angle(), Some(Angle::from_degrees(90.0)));
    }

    #[test]
    fn coincident_points_on_first_frame_set_no_reference() {
        let script = vec![
            hand((0.5, 0.5), (0.5, 0.5)),    // degenerate, nothing to reuse
            hand((0.5, 0.5), (0.5, 0.75)),   // 90°, first real reading
        ];
        let mut fl = FrameLoop::new(
            &cfg(), camera(2), ScriptedProvider::new(script), NullSink, HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.frames_with_hand, 2);
        assert_eq!(summary.final_volume, 50);
        assert_eq!(fl.rotation_state().previous_angle(), Some(Angle::from_degrees(90.0)));
    }

    #[test]
    fn sink_failures_are_counted_not_fatal() {
        let script = vec![hand((0.5, 0.5), (0.75, 0.5)); 3];
        let sink = CountingSink { calls: 0, fail: true };
        let mut fl = FrameLoop::new(
            &cfg(), camera(3), ScriptedProvider::new(script), sink, HeadlessScreen::new(),
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.applies, 0);
        // Never applied, so every frame retries
        assert_eq!(summary.failed_applies, 3);
        assert_eq!(fl.volume_state().last_applied_volume(), None);
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut screen = HeadlessScreen::new();
        screen.quit_after = Some(3);
        let mut fl = FrameLoop::new(
            &cfg(), SyntheticCamera::new(400, 400), ScriptedProvider::new(vec![]), NullSink, screen,
        );
        let summary = fl.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::UserExit);
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.frames_with_hand, 0);
    }

    #[test]
    fn display_failure_is_fatal() {
        let mut screen = HeadlessScreen::new();
        screen.fail = true;
        let mut fl = FrameLoop::new(
            &cfg(), camera(5), ScriptedProvider::new(vec![]), NullSink, screen,
        );
        assert!(matches!(fl.run(), Err(LoopError::Display(_))));
    }

    #[test]
    fn mirroring_does_not_change_tracking() {
        let mut c = cfg();
        c.mirror = true;
        let script = vec![
            hand((0.25, 0.25), (0.375, 0.25)),
            hand((0.25, 0.25), (0.25, 0.375)),
        ];
        let mut fl = FrameLoop::new(
            &c, camera(2), ScriptedProvider::new(script), NullSink, HeadlessScreen::new(),
        );
        assert_eq!(fl.run().unwrap().final_volume, 61);
    }

    #[test]
    fn shown_frame_is_mirrored() {
        let mut c = cfg();
        c.mirror = true;
        // Bottom row stays clear of the title and the no-hand notice
        let source = MarkedSource { mark: Some((0, 399)) };
        let mut fl = FrameLoop::new(&c, source, ScriptedProvider::new(vec![]), NullSink, HeadlessScreen::new());
        fl.run().unwrap();
        let shown = fl.screen.last.as_ref().unwrap();
        assert_eq!(shown.pixel(399, 399), Some(MARK));
        assert_eq!(shown.pixel(0, 399), Some(BLACK));
    }

    #[test]
    fn unmirrored_frame_keeps_its_orientation() {
        let source = MarkedSource { mark: Some((0, 399)) };
        let mut fl = FrameLoop::new(&cfg(), source, ScriptedProvider::new(vec![]), NullSink, HeadlessScreen::new());
        fl.run().unwrap();
        let shown = fl.screen.last.as_ref().unwrap();
        assert_eq!(shown.pixel(0, 399), Some(MARK));
        assert_eq!(shown.pixel(399, 399), Some(BLACK));
    }

    #[test]
    fn summary_reads_well() {
        let s = SessionSummary {
            frames: 10, frames_with_hand: 7, applies: 3, failed_applies: 1,
            final_volume: 42, stop_reason: StopReason::UserExit,
        };
        let text = s.to_string();
        assert!(text.contains("10 frames (7 with a hand)"));
        assert!(text.contains("final volume 42%"));
        assert!(text.ends_with("closed by user"));
    }
}
