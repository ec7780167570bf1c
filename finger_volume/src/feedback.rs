//! On-frame feedback overlay.
//!
//! Layout (tracking):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ INDEX FINGER ROTATION VOLUME CONTROL                         │
//! │                                                              │
//! │     [█████████████░░░░░░░░░░]  61%                           │
//! │     ANGLE: 90.0 DEG                                          │
//! │     > VOLUME UP                        ● base                │
//! │                                         \                    │
//! │                                          ◉ tip               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is a pure function of the input frame and a [`FeedbackView`]
//! snapshot; it never touches control state.

use rotation_control::{Angle, Direction, Point2D};

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const BAR_X:         i32 = 50;
const BAR_Y:         i32 = 50;
const BAR_W:         i32 = 200;
const BAR_H:         i32 = 30;
const ANGLE_Y:       i32 = 100;
const DIRECTION_Y:   i32 = 140;
const TITLE_POS:     (i32, i32) = (10, 30);
const TEXT_SCALE:    i32 = 3;
const TITLE_SCALE:   i32 = 3;

pub const LOW_TIER:  i32 = 33;
pub const HIGH_TIER: i32 = 66;

pub const RED:       u32 = 0xFFFF0000;
pub const YELLOW:    u32 = 0xFFFFFF00;
pub const GREEN:     u32 = 0xFF00FF00;
pub const WHITE:     u32 = 0xFFFFFFFF;
pub const GREY:      u32 = 0xFFC8C8C8;
const BASE_MARKER:   u32 = 0xFFFF64C8;
const FINGER_LINE:   u32 = YELLOW;

pub const NO_HAND_TEXT: &str = "NO HAND DETECTED - SHOW YOUR HAND TO CAMERA!";
pub const TITLE_TEXT:   &str = "INDEX FINGER ROTATION VOLUME CONTROL";

// ════════════════════════════════════════════════════════════════════════════
// FeedbackView — what to draw this frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingView {
    pub volume:    i32,
    pub angle:     Angle,
    pub direction: Direction,
    pub base:      Point2D,
    pub tip:       Point2D,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeedbackView {
    NoHand,
    Tracking(TrackingView),
}

/// Fill color of the volume bar.
pub fn tier_color(volume: i32) -> u32 {
    if volume < LOW_TIER {
        RED
    } else if volume < HIGH_TIER {
        YELLOW
    } else {
        GREEN
    }
}

/// Width in pixels of the filled part of a `bar_width` bar.
pub fn fill_width(volume: i32, bar_width: i32) -> i32 {
    (volume.clamp(0, 100) as f32 / 100.0 * bar_width as f32) as i32
}

pub fn direction_label(direction: Direction) -> (&'static str, u32) {
    match direction {
        Direction::Up      => ("> VOLUME UP", GREEN),
        Direction::Down    => ("< VOLUME DOWN", RED),
        Direction::Neutral => ("ROTATING FINGER", GREY),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FeedbackRenderer
// ════════════════════════════════════════════════════════════════════════════

pub struct FeedbackRenderer;

impl FeedbackRenderer {
    /// Return an annotated copy of `frame`.
    pub fn render(frame: &Frame, view: &FeedbackView) -> Frame {
        let mut out = frame.clone();
        match view {
            FeedbackView::Tracking(t) => draw_tracking(&mut out, t),
            FeedbackView::NoHand      => {
                let w = text_width(NO_HAND_TEXT, TEXT_SCALE);
                let x = out.width as i32 / 2 - w / 2;
                let y = out.height as i32 / 2;
                draw_text(&mut out, NO_HAND_TEXT, x, y, TEXT_SCALE, RED);
            }
        }
        draw_text(&mut out, TITLE_TEXT, TITLE_POS.0, TITLE_POS.1, TITLE_SCALE, YELLOW);
        out
    }
}

fn draw_tracking(f: &mut Frame, t: &TrackingView) {
    // ── finger ────────────────────────────────────────────────────────────
    draw_line(f, t.base, t.tip, 3, FINGER_LINE);
    fill_circle(f, t.base, 8, BASE_MARKER);
    fill_circle(f, t.tip, 12, GREEN);

    // ── volume bar ────────────────────────────────────────────────────────
    draw_border(f, BAR_X, BAR_Y, BAR_W, BAR_H, 2, GREY);
    let fill = fill_width(t.volume, BAR_W);
    if fill > 0 {
        fill_rect(f, BAR_X, BAR_Y, fill, BAR_H, tier_color(t.volume));
    }
    draw_text(
        f,
        &format!("{}%", t.volume),
        BAR_X + BAR_W + 10,
        BAR_Y + BAR_H,
        TEXT_SCALE,
        WHITE,
    );

    // ── readouts ──────────────────────────────────────────────────────────
    let angle = format!("ANGLE: {:.1} DEG", t.angle.degrees());
    draw_text(f, &angle, BAR_X, ANGLE_Y, TEXT_SCALE, WHITE);

    let (label, color) = direction_label(t.direction);
    draw_text(f, label, BAR_X, DIRECTION_Y, TEXT_SCALE, color);
}

// ════════════════════════════════════════════════════════════════════════════
// Primitive drawing helpers (all clip to the frame)
// ════════════════════════════════════════════════════════════════════════════

fn fill_rect(f: &mut Frame, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for row in y..y + h {
        for col in x..x + w {
            f.set_pixel(col, row, color);
        }
    }
}

/// Rectangle outline `thickness` pixels wide, drawn inward.
fn draw_border(f: &mut Frame, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
    fill_rect(f, x, y, w, thickness, color);
    fill_rect(f, x, y + h - thickness, w, thickness, color);
    fill_rect(f, x, y, thickness, h, color);
    fill_rect(f, x + w - thickness, y, thickness, h, color);
}

fn fill_circle(f: &mut Frame, c: Point2D, r: i32, color: u32) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                f.set_pixel(c.x + dx, c.y + dy, color);
            }
        }
    }
}

/// Bresenham line, stamped with a square brush of side `thickness`.
fn draw_line(f: &mut Frame, a: Point2D, b: Point2D, thickness: i32, color: u32) {
    let half = thickness / 2;
    let (mut x, mut y) = (a.x, a.y);
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        fill_rect(f, x - half, y - half, thickness, thickness, color);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Pixel width of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * GLYPH_ADVANCE * scale - scale }
}

/// Draw `text` with its baseline at `y` (the glyphs sit above it).
fn draw_text(f: &mut Frame, text: &str, x: i32, y: i32, scale: i32, color: u32) {
    let top = y - GLYPH_ROWS * scale;
    let mut cx = x;
    for ch in text.chars() {
        for (row, &bits) in glyph(ch).iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    fill_rect(f, cx + col * scale, top + row as i32 * scale, scale, scale, color);
                }
            }
        }
        cx += GLYPH_ADVANCE * scale;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font, upper case only
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_ROWS:    i32 = 5;
const GLYPH_ADVANCE: i32 = 4;

const GLYPHS: &[(char, [u8; 5])] = &[
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    ('3', [0b111, 0b001, 0b111, 0b001, 0b111]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
    ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b001, 0b001, 0b001]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    ('%', [0b101, 0b001, 0b010, 0b100, 0b101]),
    ('>', [0b100, 0b010, 0b001, 0b010, 0b100]),
    ('<', [0b001, 0b010, 0b100, 0b010, 0b001]),
    (' ', [0b000, 0b000, 0b000, 0b000, 0b000]),
];

fn glyph(c: char) -> [u8; 5] {
    let c = c.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(g, _)| *g == c)
        .map(|(_, rows)| *rows)
        .unwrap_or([0b000, 0b000, 0b010, 0b000, 0b000])
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const BG: u32 = 0xFF000000;

    fn blank() -> Frame { Frame::new(640, 360, BG) }

    fn tracking(volume: i32, direction: Direction) -> FeedbackView {
        FeedbackView::Tracking(TrackingView {
            volume,
            angle: Angle::from_degrees(90.0),
            direction,
            base: Point2D::new(500, 200),
            tip:  Point2D::new(500, 300),
        })
    }

    fn bar_interior(f: &Frame, x: i32) -> u32 {
        f.pixel(x as usize, (BAR_Y + BAR_H / 2) as usize).unwrap()
    }

    #[test]
    fn tiers_switch_at_33_and_66() {
        assert_eq!(tier_color(0), RED);
        assert_eq!(tier_color(32), RED);
        assert_eq!(tier_color(33), YELLOW);
        assert_eq!(tier_color(65), YELLOW);
        assert_eq!(tier_color(66), GREEN);
        assert_eq!(tier_color(100), GREEN);
    }

    #[test]
    fn fill_is_proportional() {
        assert_eq!(fill_width(0, 200), 0);
        assert_eq!(fill_width(50, 200), 100);
        assert_eq!(fill_width(61, 200), 122);
        assert_eq!(fill_width(100, 200), 200);
    }

    #[test]
    fn render_leaves_input_untouched() {
        let input = blank();
        let snapshot = input.clone();
        let out = FeedbackRenderer::render(&input, &tracking(50, Direction::Up));
        assert_eq!(input, snapshot);
        assert_ne!(out, snapshot);
    }

    #[test]
    fn bar_fill_matches_volume() {
        let out = FeedbackRenderer::render(&blank(), &tracking(50, Direction::Neutral));
        assert_eq!(bar_interior(&out, BAR_X + 10), YELLOW);
        assert_eq!(bar_interior(&out, BAR_X + 99), YELLOW);
        assert_eq!(bar_interior(&out, BAR_X + 150), BG);
        // Outline on the far edge
        assert_eq!(bar_interior(&out, BAR_X + BAR_W - 1), GREY);

        let loud = FeedbackRenderer::render(&blank(), &tracking(90, Direction::Up));
        assert_eq!(bar_interior(&loud, BAR_X + 150), GREEN);
    }

    #[test]
    fn empty_bar_has_no_fill() {
        let out = FeedbackRenderer::render(&blank(), &tracking(0, Direction::Down));
        assert_eq!(bar_interior(&out, BAR_X + 10), BG);
    }

    #[test]
    fn direction_labels() {
        assert_eq!(direction_label(Direction::Up), ("> VOLUME UP", GREEN));
        assert_eq!(direction_label(Direction::Down), ("< VOLUME DOWN", RED));
        assert_eq!(direction_label(Direction::Neutral).0, "ROTATING FINGER");
    }

    #[test]
    fn no_hand_skips_bar_and_shows_notice() {
        let out = FeedbackRenderer::render(&blank(), &FeedbackView::NoHand);
        assert_eq!(bar_interior(&out, BAR_X + 10), BG);
        assert!(!out.pixels.contains(&GREY));
        // The notice straddles the centre row band
        let band = (out.height / 2 - 15)..(out.height / 2);
        let red_in_band = band
            .flat_map(|y| (0..out.width).map(move |x| (x, y)))
            .any(|(x, y)| out.pixel(x, y) == Some(RED));
        assert!(red_in_band);
    }

    #[test]
    fn finger_markers_are_drawn() {
        let out = FeedbackRenderer::render(&blank(), &tracking(50, Direction::Up));
        assert_eq!(out.pixel(500, 300), Some(GREEN));
        assert_eq!(out.pixel(500, 200), Some(BASE_MARKER));
        assert_eq!(out.pixel(500, 250), Some(FINGER_LINE));
    }

    #[test]
    fn drawing_off_frame_does_not_panic() {
        let view = FeedbackView::Tracking(TrackingView {
            volume:    100,
            angle:     Angle::ZERO,
            direction: Direction::Neutral,
            base:      Point2D::new(-40, -40),
            tip:       Point2D::new(5000, 9000),
        });
        let tiny = Frame::new(20, 10, BG);
        let out = FeedbackRenderer::render(&tiny, &view);
        assert_eq!(out.pixels.len(), 200);
    }

    #[test]
    fn text_width_counts_gaps() {
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_width("A", 3), 9);
        assert_eq!(text_width("AB", 3), 21);
    }
}
