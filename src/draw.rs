// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the live camera image with the beam on top.
// 2) Crosshairs marking the tracked center and tips (debug overlay).
// 3) A tiny 5x7 bitmap font to render HUD text on top of the video.

use crate::driver::Surface;
use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,        // the on-screen window you see
    mouse_was_down: bool,  // previous left-button state, for click edges
}

impl Drawer {
    /// Create a window sized to the camera feed, paced to `fps`.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // update_with_buffer sleeps to hold this rate, one tick per refresh
        window.set_target_fps(fps);
        Ok(Self { window, mouse_was_down: false })
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    fn mouse_pos(&self) -> Option<(usize, usize)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize))
    }
}

impl Surface for Drawer {
    /// False when the user closes the window or holds ESC.
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image (live video + beam).
    fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Reports the pointer position once per left-button press.
    fn take_click(&mut self) -> Option<(usize, usize)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.mouse_was_down;
        self.mouse_was_down = down;
        if pressed { self.mouse_pos() } else { None }
    }

    // D flips the debug overlay (crosshairs + HUD).
    fn overlay_toggled(&mut self) -> bool {
        self.window.is_key_pressed(Key::D, KeyRepeat::No)
    }
}

/* ---------- Software drawing: markers and HUD text ---------- */

/// Write one pixel; anything outside the frame is dropped.
#[inline]
fn plot(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 || x as usize >= fb.width || y as usize >= fb.height {
        return;
    }
    fb.pixels[y as usize * fb.width + x as usize] = color;
}

/// Horizontal or vertical run of pixels from `from` to `to` (inclusive) along one axis.
fn axis_run(fb: &mut FrameBuffer, fixed: i32, from: i32, to: i32, horizontal: bool, color: u32) {
    for v in from.min(to)..=from.max(to) {
        if horizontal { plot(fb, v, fixed, color) } else { plot(fb, fixed, v, color) }
    }
}

/// Draw a "+" marker of arm length `size` at (cx,cy), leaving a 1 px gap around the dot.
/// Visual: a small cross pinned to a tracked point.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    const GAP: i32 = 2;
    if size >= GAP {
        axis_run(fb, cy, cx - size, cx - GAP, true, color);
        axis_run(fb, cy, cx + GAP, cx + size, true, color);
        axis_run(fb, cx, cy - size, cy - GAP, false, color);
        axis_run(fb, cx, cy + GAP, cy + size, false, color);
    }
    plot(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (ASCII subset for "FPS: 00.0 | PTS: 0 | RGB: 0 0 0") ---------- */

/// Rows top to bottom; bit 4 of each row is the leftmost pixel.
const FONT_5X7: &[(char, [u8; 7])] = &[
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1E, 0x01, 0x01, 0x0E, 0x01, 0x01, 0x1E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    (' ', [0x00; 7]),
    ('|', [0x04; 7]),
    (':', [0x00, 0x04, 0x00, 0x00, 0x04, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00]),
];

fn glyph5x7(ch: char) -> Option<&'static [u8; 7]> {
    FONT_5X7.iter().find(|(c, _)| *c == ch).map(|(_, rows)| rows)
}

/// Stamp one glyph at (x,y). Unknown characters leave a blank cell.
fn stamp_glyph(fb: &mut FrameBuffer, x: i32, y: i32, rows: &[u8; 7], color: u32) {
    for (ry, bits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if bits & (0x10 >> rx) != 0 {
                plot(fb, x + rx, y + ry as i32, color);
            }
        }
    }
}

/// Draw a HUD string: each glyph gets a black drop shadow at (+1,+1), then the
/// glyph itself; cells advance 6 px (5 px glyph + 1 px spacing).
/// Visual: compact, readable text on top of any camera image.
pub fn draw_text_5x7(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, color: u32) {
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph5x7(ch) else { continue };
        let cx = x + 6 * i as i32;
        stamp_glyph(fb, cx + 1, y + 1, rows, 0x00_00_00_00);
        stamp_glyph(fb, cx, y, rows, color);
    }
}
