use std::error::Error;
use std::fmt;
use std::io;

/// Errors raised by the aggregation engine and its I/O collaborators
#[derive(Debug)]
pub enum DlaError {
    /// A query addressed a cell outside `[0, size)` on either axis
    CoordinateOutOfRange { x: i64, y: i64, size: usize },
    /// The launch annulus has no usable point inside the grid
    AnnulusOutOfBounds {
        center: (usize, usize),
        radius: usize,
        size: usize,
    },
    /// A walking particle is boxed in by occupied cells and failed to stick
    NoLegalMove { x: usize, y: usize },
    InvalidConfig(String),
    InvalidSnapshot(String),
    Io(io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
}

impl fmt::Display for DlaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DlaError::CoordinateOutOfRange { x, y, size } => {
                write!(f, "coordinate ({x}, {y}) is outside the {size}x{size} grid")
            }
            DlaError::AnnulusOutOfBounds {
                center,
                radius,
                size,
            } => write!(
                f,
                "launch annulus of radius {radius} around ({}, {}) does not fit the {size}x{size} grid",
                center.0, center.1
            ),
            DlaError::NoLegalMove { x, y } => {
                write!(f, "particle at ({x}, {y}) has no unoccupied neighbour")
            }
            DlaError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            DlaError::InvalidSnapshot(msg) => write!(f, "invalid grid snapshot: {msg}"),
            DlaError::Io(e) => write!(f, "I/O error: {e}"),
            DlaError::Json(e) => write!(f, "JSON error: {e}"),
            DlaError::Image(e) => write!(f, "image error: {e}"),
        }
    }
}

impl Error for DlaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DlaError::Io(e) => Some(e),
            DlaError::Json(e) => Some(e),
            DlaError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DlaError {
    fn from(e: io::Error) -> Self {
        DlaError::Io(e)
    }
}

impl From<serde_json::Error> for DlaError {
    fn from(e: serde_json::Error) -> Self {
        DlaError::Json(e)
    }
}

impl From<image::ImageError> for DlaError {
    fn from(e: image::ImageError) -> Self {
        DlaError::Image(e)
    }
}
