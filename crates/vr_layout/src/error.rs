use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("surface size {width}x{height} has no area")]
    InvalidSurface { width: u32, height: u32 },

    #[error("invalid rectangle: {0}")]
    InvalidRect(String),

    #[error("invalid VR size {width}x{height}")]
    InvalidVrSize { width: f64, height: f64 },

    #[error("invalid VR pose ({x}, {eye_y})")]
    InvalidVrPose { x: f64, eye_y: f64 },

    #[error("no free position for a {width}x{height} rectangle")]
    NoSpaceAvailable { width: f64, height: f64 },
}
