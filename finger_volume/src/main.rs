//! finger_volume — interactive entry point.

use anyhow::Context;
use clap::Parser;
use finger_volume::app::{run, AppConfig};
use rotation_control::RotationConfig;

#[derive(Parser, Debug)]
#[command(name = "finger_volume", about = "Control system volume by rotating your index finger")]
struct Args {
    /// Degrees of rotation per 1% volume step.
    #[arg(long, default_value_t = 8.0)]
    sensitivity: f64,
    /// Minimum per-frame rotation (degrees) that changes the volume.
    #[arg(long, default_value_t = 3.0)]
    threshold: f64,
    /// Starting volume, 0–100.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    initial_volume: i32,
    /// Forget the last finger angle after this many frames without a hand.
    #[arg(long)]
    reset_after_missed: Option<u32>,
    /// Frame width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: usize,
    /// Frame height in pixels.
    #[arg(long, default_value_t = 720)]
    height: usize,
    /// Show frames unmirrored.
    #[arg(long)]
    no_mirror: bool,
    /// Never touch the system mixer.
    #[arg(long)]
    no_audio: bool,
    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let rotation = RotationConfig::new(self.sensitivity, self.threshold)
            .and_then(|c| c.with_reset_after_missed(self.reset_after_missed))
            .context("invalid rotation settings")?;
        Ok(AppConfig {
            rotation,
            initial_volume: self.initial_volume,
            width:          self.width,
            height:         self.height,
            mirror:         !self.no_mirror,
            audio:          !self.no_audio,
            max_frames:     self.frames,
            ..AppConfig::default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Args::parse().into_config()?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Volume Control — Index Finger Rotation Gesture        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Pointer simulation  (use --features leap for hardware)");
    println!();
    println!("  • Show your INDEX FINGER (simulation: move the pointer)");
    println!("  • Rotate CLOCKWISE (>)          = INCREASE volume");
    println!("  • Rotate COUNTER-CLOCKWISE (<)  = DECREASE volume");
    println!("  • Press 'q' to exit");
    println!();

    let summary = run(cfg).context("volume control session failed")?;

    println!();
    println!("  {}", summary);
    println!("  Resources released.");
    Ok(())
}
