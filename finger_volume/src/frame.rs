//! Frames and where they come from.
//!
//! A [`Frame`] is a packed ARGB (`0xAARRGGBB`) buffer, the same layout the
//! `minifb` window consumes, so an annotated frame can be shown without
//! conversion.

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width:  usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Frame { width, height, pixels: vec![fill; width * height] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Write one pixel; coordinates outside the frame are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Flip left ↔ right, so the picture behaves like a mirror.
    pub fn mirrored(&self) -> Frame {
        let mut out = self.clone();
        for row in out.pixels.chunks_mut(self.width.max(1)) {
            row.reverse();
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource — pull-based acquisition
// ════════════════════════════════════════════════════════════════════════════

/// A lazy, possibly endless sequence of frames.  `None` means the source is
/// exhausted (end of stream or device gone) and the loop should stop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

// ════════════════════════════════════════════════════════════════════════════
// SyntheticCamera — backdrop frames for simulation mode
// ════════════════════════════════════════════════════════════════════════════

const BACKDROP_TOP:    u32 = 0xFF1A1A2E;
const BACKDROP_BOTTOM: u32 = 0xFF0F3460;
const GRID_COLOR:      u32 = 0xFF26305A;
const GRID_STEP:       usize = 80;

/// Stands in for a webcam: yields the same vertical-gradient backdrop with a
/// faint grid, optionally for a limited number of frames.
pub struct SyntheticCamera {
    backdrop: Frame,
    limit:    Option<u64>,
    produced: u64,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize) -> Self {
        SyntheticCamera { backdrop: backdrop(width, height), limit: None, produced: 0 }
    }

    /// Stop after `limit` frames (`None` = never).
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn produced(&self) -> u64 { self.produced }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.limit.map_or(false, |l| self.produced >= l) {
            return None;
        }
        self.produced += 1;
        Some(self.backdrop.clone())
    }
}

fn backdrop(width: usize, height: usize) -> Frame {
    let mut f = Frame::new(width, height, BACKDROP_TOP);
    for y in 0..height {
        let t = y as f32 / height.max(1) as f32;
        let row_color = lerp_argb(BACKDROP_TOP, BACKDROP_BOTTOM, t);
        for x in 0..width {
            let on_grid = x % GRID_STEP == 0 || y % GRID_STEP == 0;
            f.pixels[y * width + x] = if on_grid { GRID_COLOR } else { row_color };
        }
    }
    f
}

/// Linear blend of two opaque ARGB colors. `t` = 0.0 → `a`, 1.0 → `b`.
pub fn lerp_argb(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t) as u32) << shift
    };
    0xFF000000 | ch(16) | ch(8) | ch(0)
}
