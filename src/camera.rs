// Opens a camera and converts frames into buffers the tracker and window understand.
// Visual expectation: each `next_frame()` yields a Vec<u32> where each pixel is
// 0x00RRGGBB, ready to scan for the target color and push to the screen.

use crate::driver::FrameSource;
use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// Decoded frames arrive as `image` RGB buffers.
use image::RgbImage;

// A small wrapper around nokhwa::Camera so the frame driver stays backend-agnostic.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Try to open camera `index` near the requested resolution.
    /// Fails with `Error::CameraInit` when the device is missing or access is denied.
    pub fn new(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            fps,
        );

        // Ask for RGB frames at the closest format the device supports.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream may settle on a different native resolution than requested.
        let actual = cam.resolution();
        if actual.width() != width || actual.height() != height {
            log::debug!(
                "camera {index}: requested {width}x{height}, got {}x{}",
                actual.width(),
                actual.height()
            );
        }

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }
}

impl FrameSource for CameraCapture {
    fn resolution(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// Blocks until the camera delivers the next frame.
    fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        Ok(frame_from_rgb(&rgb_img))
    }
}

/// Pack an RGB image into a 0x00RRGGBB framebuffer (row-major).
pub fn frame_from_rgb(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use image::Rgb;

    #[test]
    fn rgb_image_packs_row_major() {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        img.put_pixel(2, 0, Rgb([1, 2, 3]));
        img.put_pixel(0, 1, Rgb([250, 128, 7]));

        let fb = frame_from_rgb(&img);
        assert_eq!((fb.width, fb.height), (3, 2));
        assert_eq!(fb.pixels[2], 0x0001_0203);
        assert_eq!(fb.color_at(0, 1), Some(Color::new(250, 128, 7)));
    }
}
