//! Rigcam
//!
//! A client for a networked still camera mounted on a laboratory
//! automation rig. The camera tool drives the rig's motion controller
//! into position over a target, pulls one encoded frame from the camera
//! server over HTTP, and runs a small processing pipeline (circular
//! region-of-interest masking and per-channel color averaging) for
//! colorimetric sampling.

use thiserror::Error;

pub mod camera;
pub mod config;
pub mod labware;
pub mod machine;
pub mod pipeline;

pub use camera::Camera;
pub use config::CameraConfig;
pub use labware::Well;
pub use machine::{resolve_target, MotionControl};
pub use pipeline::RgbSample;

/// Result type alias for camera client operations.
pub type RigcamResult<T> = Result<T, CameraError>;

/// Error types for camera client operations.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("InvalidTarget: {0}")]
    InvalidTarget(String),
    #[error("MachineError: {0}")]
    Machine(String),
    #[error("CaptureError: {0}")]
    Capture(String),
    #[error("ImageError: {0}")]
    Image(#[from] image::ImageError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("ConfigError: {0}")]
    Config(#[from] config::ConfigError),
}
