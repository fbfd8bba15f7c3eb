use std::fmt;

use crate::model::{Padding, Rect};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Template(serde_json::Error),
    /// Padding leaves no positive interior inside the outer box.
    InvalidGeometry { outer: Rect, padding: Padding },
    /// A text + dropdown box too narrow for its dropdown zone and gap.
    CompoundTooNarrow {
        outer: Rect,
        dropdown_width: f32,
        gap: f32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Template(e) => write!(f, "invalid template: {e}"),
            Error::InvalidGeometry { outer, padding } => write!(
                f,
                "padding ({}, {}) does not fit box {}x{} at ({}, {})",
                padding.x, padding.y, outer.width, outer.height, outer.x, outer.y
            ),
            Error::CompoundTooNarrow {
                outer,
                dropdown_width,
                gap,
            } => write!(
                f,
                "dropdown zone of width {dropdown_width} plus gap {gap} leaves no text zone in box {}x{} at ({}, {})",
                outer.width, outer.height, outer.x, outer.y
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Template(e) => Some(e),
            Error::InvalidGeometry { .. } | Error::CompoundTooNarrow { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Template(e)
    }
}
