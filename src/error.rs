use std::io;

use svgr::ViewBox;
use thiserror::Error;

/// Reasons a render stops. Any of them means the canvas is incomplete.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Document(#[from] svgr::Error),

    #[error("malformed document: missing viewBox")]
    MissingViewBox,

    #[error("malformed document: viewBox {0:?} has a negative or non-finite size")]
    InvalidViewBox(ViewBox),

    #[error("division by zero: viewBox {0:?} has a zero width or height")]
    DivideByZero(ViewBox),

    #[error("target rectangle {width}x{height} is empty")]
    EmptyTarget { width: u32, height: u32 },

    #[error("target rectangle {width}x{height} is too large for a cairo surface")]
    TargetTooLarge { width: u32, height: u32 },

    #[error("malformed document: <{tag}> requires `{name}`")]
    MissingAttribute { tag: &'static str, name: &'static str },

    #[error("malformed document: `{symbol}` needs {expected} parameters, got {got}")]
    MissingParameters { symbol: char, expected: usize, got: usize },

    #[error("cairo surface error: {0:?}")]
    Surface(cairo::Error),

    #[error("failed to encode png: {0}")]
    Png(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
