mod beam;
mod camera;
mod cli;
mod color;
mod draw;
mod driver;
mod error;
mod geometry;
mod locator;
mod snapshot;
mod types;

use std::process::ExitCode;

use camera::CameraCapture;
use clap::Parser;
use cli::Args;
use draw::Drawer;
use driver::FrameDriver;
use error::Error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Every failure, including a camera that can't be opened, is reported once here.
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = args.tracker_config()?;
    log::info!(
        "tracking rgb({}, {}, {}) below squared distance {}",
        config.matcher.target.r,
        config.matcher.target.g,
        config.matcher.target.b,
        config.matcher.threshold
    );

    /* --- Camera ---
       The window can only be sized once we know the camera's native resolution. */
    let mut driver = FrameDriver::new(config, args.overlay);
    let (w, h) =
        driver.acquire(|| CameraCapture::new(args.camera, args.width, args.height, args.fps))?;

    /* --- Window ---
       Visual: window opens with the live feed; the beam appears over the target color.
       Click anywhere to log the RGB under the pointer; D toggles the overlay; ESC quits. */
    let mut drawer = Drawer::new("Saber Tracker", w, h, args.fps as usize)?;

    driver.run(&mut drawer)
}
