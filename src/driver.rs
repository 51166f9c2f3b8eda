// Frame driver: owns the camera once it is open and runs one
// capture -> locate -> render -> present step per tick.
// Visual expectation: after `acquire` succeeds the window shows the live feed,
// and whenever the target color is in view a beam is drawn over it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::beam::{render_beam, BeamStroke};
use crate::draw::{draw_crosshair, draw_text_5x7};
use crate::error::Error;
use crate::locator::{analyze, TrackerConfig};
use crate::snapshot::FrameSnapshot;
use crate::types::{Color, FrameAnalysis, FrameBuffer};

/// Where frames come from (a camera in the app, a fake in tests).
pub trait FrameSource {
    /// Native resolution, fixed once the source is open.
    fn resolution(&self) -> (usize, usize);
    fn next_frame(&mut self) -> Result<FrameBuffer, Error>;
}

/// Where finished frames go, plus the user input the driver cares about.
pub trait Surface {
    /// False once the user closed the view; ends the loop.
    fn is_open(&self) -> bool;
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
    /// Surface-local position of a click since the last call, if any.
    fn take_click(&mut self) -> Option<(usize, usize)>;
    /// True once per request to show/hide the debug overlay.
    fn overlay_toggled(&mut self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Capturing,
    Running,
    Failed,
}

impl DriverState {
    fn name(self) -> &'static str {
        match self {
            DriverState::Idle => "idle",
            DriverState::Capturing => "capturing",
            DriverState::Running => "running",
            DriverState::Failed => "failed",
        }
    }
}

/// Result of a debug click: the pixel under the pointer in the last captured frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelProbe {
    pub x: usize,
    pub y: usize,
    pub version: u64,
    pub color: Color,
}

/// What one tick produced.
#[derive(Debug)]
pub struct TickReport {
    pub version: u64,
    pub analysis: FrameAnalysis,
    pub beam: Option<BeamStroke>,
    pub probe: Option<PixelProbe>,
}

/// Frames-per-second counter, refreshed once per second.
struct FpsCounter {
    last: Instant,
    frames: u32,
    text: String,
}

impl FpsCounter {
    fn new() -> Self {
        Self { last: Instant::now(), frames: 0, text: String::from("FPS: 0.0") }
    }

    fn frame(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            log::info!("FPS: {fps:.1}");
            self.text = format!("FPS: {fps:.1}");
            self.frames = 0;
            self.last = now;
        }
    }
}

pub struct FrameDriver<S> {
    config: TrackerConfig,
    state: DriverState,
    source: Option<S>,
    screen: FrameBuffer,
    snapshot: Arc<FrameSnapshot>,
    show_overlay: bool,
    last_probe: Option<PixelProbe>,
    fps: FpsCounter,
}

impl<S: FrameSource> FrameDriver<S> {
    pub fn new(config: TrackerConfig, show_overlay: bool) -> Self {
        Self {
            config,
            state: DriverState::Idle,
            source: None,
            screen: FrameBuffer { width: 0, height: 0, pixels: Vec::new() },
            snapshot: Arc::new(FrameSnapshot::new()),
            show_overlay,
            last_probe: None,
            fps: FpsCounter::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DriverState {
        self.state
    }

    fn set_state(&mut self, next: DriverState) {
        log::debug!("frame driver: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn invalid(&self, op: &'static str) -> Error {
        Error::InvalidState { op, state: self.state.name() }
    }

    /// Open the frame source. On success the screen is sized to the source's
    /// native resolution and the driver is Running. On failure it is Failed for good.
    pub fn acquire<F>(&mut self, open: F) -> Result<(usize, usize), Error>
    where
        F: FnOnce() -> Result<S, Error>,
    {
        if self.state != DriverState::Idle {
            return Err(self.invalid("acquire a frame source"));
        }
        self.set_state(DriverState::Capturing);

        let source = match open() {
            Ok(source) => source,
            Err(e) => {
                self.set_state(DriverState::Failed);
                return Err(e);
            }
        };

        let (w, h) = source.resolution();
        self.screen = FrameBuffer { width: w, height: h, pixels: vec![0u32; w * h] };
        self.source = Some(source);
        log::info!("frame source ready at {w}x{h}");
        self.set_state(DriverState::Running);
        Ok((w, h))
    }

    /// One frame: probe click -> capture -> draw video -> locate -> beam -> present.
    pub fn tick<D: Surface>(&mut self, surface: &mut D) -> Result<TickReport, Error> {
        if self.state != DriverState::Running {
            return Err(self.invalid("tick"));
        }
        let Some(source) = self.source.as_mut() else {
            return Err(self.invalid("tick"));
        };

        if surface.overlay_toggled() {
            self.show_overlay = !self.show_overlay;
        }

        // Clicks read the frame captured on an earlier tick.
        let probe = surface.take_click().and_then(|(x, y)| {
            let (version, color) = self.snapshot.pixel_at(x, y)?;
            Some(PixelProbe { x, y, version, color })
        });
        if let Some(p) = probe {
            log::info!(
                "pixel ({}, {}) in frame {}: rgb({}, {}, {})",
                p.x,
                p.y,
                p.version,
                p.color.r,
                p.color.g,
                p.color.b
            );
            self.last_probe = probe;
        }

        let live = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.set_state(DriverState::Failed);
                return Err(e);
            }
        };

        // Clear + draw the video frame as the background.
        if self.screen.width == live.width && self.screen.height == live.height {
            self.screen.pixels.copy_from_slice(&live.pixels);
        } else {
            self.screen = live.clone();
        }

        let analysis = analyze(&live, &self.config);
        let version = self.snapshot.publish(live);
        let beam = render_beam(&mut self.screen, analysis.tips.as_ref());

        if self.show_overlay {
            self.draw_overlay(&analysis);
        }

        surface.present(&self.screen)?;
        self.fps.frame();

        Ok(TickReport { version, analysis, beam, probe })
    }

    /// Tick until the surface closes. Any tick error stops the loop.
    pub fn run<D: Surface>(&mut self, surface: &mut D) -> Result<(), Error> {
        while surface.is_open() {
            let report = self.tick(surface)?;
            log::trace!(
                "frame {}: {} points, tips {:?}, beam width {:?}, clicked {}",
                report.version,
                report.analysis.points.len(),
                report.analysis.tips,
                report.beam.map(|b| b.width),
                report.probe.is_some()
            );
        }
        log::info!("surface closed, stopping");
        Ok(())
    }

    /// Crosshairs on center and tips, plus a small HUD line.
    fn draw_overlay(&mut self, analysis: &FrameAnalysis) {
        let fb = &mut self.screen;
        if let Some(c) = analysis.center {
            draw_crosshair(fb, c.x, c.y, 10, 0x00_FF_CC_33); // yellow + on the centroid
        }
        if let Some(tips) = analysis.tips {
            draw_crosshair(fb, tips[0].x, tips[0].y, 6, 0x00_33_CC_FF); // hilt
            draw_crosshair(fb, tips[1].x, tips[1].y, 6, 0x00_FF_33_66); // blade
        }

        let mut hud = format!("{} | PTS: {}", self.fps.text, analysis.points.len());
        if let Some(p) = self.last_probe {
            hud.push_str(&format!(" | RGB: {} {} {}", p.color.r, p.color.g, p.color.b));
        }
        draw_text_5x7(fb, 8, 8, &hud, 0x00_FF_FF_FF);
    }
}
