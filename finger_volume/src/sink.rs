//! System mixer access.
//!
//! Each backend is a command-line mixer that can set the master output level
//! in one call.  [`open_system_sink`] probes the platform's candidates in
//! order and falls back to [`NullSink`] when none answers, so a machine
//! without audio still runs the tracker and the feedback window.

use std::process::{Command, Stdio};

use log::{info, warn};
use rotation_control::{NullSink, SinkError, VolumeSink};

// ════════════════════════════════════════════════════════════════════════════
// MixerBackend
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MixerBackend {
    /// PulseAudio / PipeWire default sink.
    Pactl,
    /// ALSA `Master` control.
    Amixer,
    /// macOS output volume via AppleScript.
    Osascript,
}

impl MixerBackend {
    /// Backends worth probing on this platform, most preferred first.
    pub fn candidates() -> &'static [MixerBackend] {
        if cfg!(target_os = "macos") {
            &[MixerBackend::Osascript]
        } else if cfg!(target_os = "linux") {
            &[MixerBackend::Pactl, MixerBackend::Amixer]
        } else {
            &[]
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            MixerBackend::Pactl     => "pactl",
            MixerBackend::Amixer    => "amixer",
            MixerBackend::Osascript => "osascript",
        }
    }

    /// A harmless command that succeeds only if the mixer is reachable.
    fn probe_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            MixerBackend::Pactl     => &["info"],
            MixerBackend::Amixer    => &["sget", "Master"],
            MixerBackend::Osascript => &["-e", "output volume of (get volume settings)"],
        };
        args.iter().map(|s| s.to_string()).collect()
    }

    /// Arguments that set the output level to `percent` (0–100).
    pub fn set_args(self, percent: u32) -> Vec<String> {
        match self {
            MixerBackend::Pactl => vec![
                "set-sink-volume".into(),
                "@DEFAULT_SINK@".into(),
                format!("{}%", percent),
            ],
            MixerBackend::Amixer => vec![
                "-q".into(),
                "sset".into(),
                "Master".into(),
                format!("{}%", percent),
            ],
            MixerBackend::Osascript => vec![
                "-e".into(),
                format!("set volume output volume {}", percent),
            ],
        }
    }

    fn probe(self) -> bool {
        run_quiet(self.program(), &self.probe_args()).is_ok()
    }
}

fn run_quiet(program: &str, args: &[String]) -> Result<(), SinkError> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(SinkError::CommandFailed {
            program: program.to_string(),
            status:  status.to_string(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CommandSink
// ════════════════════════════════════════════════════════════════════════════

/// Sets the system volume by running the backend's mixer command.
#[derive(Debug)]
pub struct CommandSink {
    backend: MixerBackend,
}

impl CommandSink {
    pub fn new(backend: MixerBackend) -> Self {
        CommandSink { backend }
    }

    pub fn backend(&self) -> MixerBackend { self.backend }
}

/// Convert a 0.0–1.0 level into a whole percentage.
pub fn level_to_percent(level: f32) -> Result<u32, SinkError> {
    if !(0.0..=1.0).contains(&level) {
        return Err(SinkError::OutOfRange(level));
    }
    Ok((level * 100.0).round() as u32)
}

impl VolumeSink for CommandSink {
    fn name(&self) -> &str { self.backend.program() }

    fn set_volume(&mut self, level: f32) -> Result<(), SinkError> {
        let percent = level_to_percent(level)?;
        run_quiet(self.backend.program(), &self.backend.set_args(percent))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_system_sink — probe backends and pick the first that answers
// ════════════════════════════════════════════════════════════════════════════

/// Try each platform mixer in turn.
/// Falls back to `NullSink` with a warning if none is reachable.
pub fn open_system_sink() -> Box<dyn VolumeSink> {
    open_first(MixerBackend::candidates(), MixerBackend::probe)
}

/// First backend in `candidates` for which `probe` answers, else `NullSink`.
pub fn open_first<F>(candidates: &[MixerBackend], probe: F) -> Box<dyn VolumeSink>
where
    F: Fn(MixerBackend) -> bool,
{
    for &backend in candidates {
        if probe(backend) {
            info!("[sink] using system mixer: {}", backend.program());
            return Box::new(CommandSink::new(backend));
        }
        info!("[sink] {} not available", backend.program());
    }

    warn!("[sink] no system mixer reachable, volume changes stay internal.");
    warn!("[sink] install one of:");
    warn!("       • Linux: `pactl` (pulseaudio-utils) or `amixer` (alsa-utils)");
    warn!("       • macOS: `osascript` (always present)");
    Box::new(NullSink)
}
