use clap::Parser;

use crate::color::{parse_rgb, ColorMatcher};
use crate::error::Error;
use crate::locator::TrackerConfig;
use crate::types::Color;

/// Command-line options. Everything is fixed for the lifetime of the process.
#[derive(Parser, Debug)]
#[command(about = "Track a colored object on camera and draw a lightsaber beam along it", version)]
pub struct Args {
    /// Camera device index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width; the camera may pick a nearby native size
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Capture and display rate
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Color to track, as R,G,B
    #[arg(long, default_value = "0,255,0")]
    pub target: String,

    /// Match when the squared RGB distance to the target is below this value
    #[arg(long, default_value_t = 9000)]
    pub threshold: u32,

    /// Tip re-clustering passes per frame (1 = single refinement)
    #[arg(long, default_value_t = 1)]
    pub refine: usize,

    /// Start with the debug overlay (crosshairs + HUD) visible; D toggles it
    #[arg(long)]
    pub overlay: bool,
}

impl Args {
    pub fn target_color(&self) -> Result<Color, Error> {
        parse_rgb(&self.target)
    }

    pub fn tracker_config(&self) -> Result<TrackerConfig, Error> {
        Ok(TrackerConfig {
            matcher: ColorMatcher::new(self.target_color()?, self.threshold),
            refine_iterations: self.refine,
        })
    }
}
