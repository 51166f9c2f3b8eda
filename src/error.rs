// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String),   // Opening/starting the camera failed (permission, no device)
    #[error("Camera frame error: {0}")]
    CameraFrame(String),  // Grabbing/decoding a frame failed
    #[error("Invalid color {0:?}: expected R,G,B with each channel 0-255")]
    InvalidColor(String), // --target could not be parsed
    #[error("Cannot {op} while the frame driver is {state}")]
    InvalidState { op: &'static str, state: &'static str }, // driver used out of order
}
