//! Parsing of the small svg dialect rendered by `svgpaint`.
//!
//! A [`Document`] is read in one go through the `svg` event parser. Every
//! element the renderer will visit gets its attributes converted once into
//! a typed struct from [`tag::attributes`], so a malformed value is reported
//! while parsing rather than halfway through drawing. Elements below
//! anything other than the root `<svg>` or a `<g>` are kept untyped.

pub mod color;
mod error;
mod parse;
pub mod path;
pub mod tag;
pub mod types;

pub use color::{Color, Paint};
pub use error::Error;
pub use parse::Document;
pub use path::{Command, Path, Subpath};
pub use tag::{Node, Tag, attributes};
pub use types::{AttributeError, FromAttribute, Length, ValueError, ViewBox};
