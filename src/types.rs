// Core types shared by the tracking pipeline, the beam renderer and the window.

/// Packed camera frame, one u32 per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with a single color.
    #[cfg(test)]
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self { width, height, pixels: vec![color.pack(); width * height] }
    }

    /// Color at (x,y), or None when outside the frame.
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::unpack(self.pixels[y * self.width + x]))
    }

    /// Row-major iterator over every pixel color.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.iter().map(|&px| Color::unpack(px))
    }
}

/// A pixel location in frame space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 8-bit RGB triplet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 0x00RRGGBB -> Color (the top byte is ignored).
    #[inline]
    pub fn unpack(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Color -> 0x00RRGGBB
    #[inline]
    pub fn pack(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// The two estimated ends of the tracked region.
/// Index 0 is the bottom (hilt) tip, index 1 the far (blade) tip.
pub type TipPair = [Point; 2];

/// Everything the locator derives from one frame.
/// Built fresh per tick and dropped at its end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameAnalysis {
    pub points: Vec<Point>,
    pub center: Option<Point>,
    pub tips: Option<TipPair>,
}
