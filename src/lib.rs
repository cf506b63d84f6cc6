//! Rasterizes a small svg dialect with cairo.
//!
//! Supported are `<path>` (`M m L l H h V v C Z z`), `<rect>` and `<g>`,
//! with `fill`, `stroke` and integral `stroke-width`. Coordinates are
//! scaled from the document's viewBox onto a target rectangle.
//!
//! ```no_run
//! use svgpaint::{draw_svg, Target};
//!
//! let file = std::fs::File::open("icon.svg")?;
//! let rendering = draw_svg(file, Target::new(400, 400), true)?;
//! rendering.raster.save_png("icon.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Read;

use svgr::Document;

pub mod canvas;
mod error;
pub mod interpret;
pub mod viewbox;

pub use canvas::{Canvas, Raster};
pub use error::RenderError;
pub use interpret::{Diagnostic, Interpreter};
pub use viewbox::{Resolution, ScaleFactors, Target};

pub struct Rendering {
    pub raster: Raster,
    pub resolution: Resolution,
    /// Unsupported path commands that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads a whole document from `reader` and draws it onto a new raster
/// sized from the viewBox and `target`.
pub fn draw_svg<R: Read>(reader: R, target: Target, keep_aspect: bool) -> Result<Rendering, RenderError> {
    let document = Document::read(reader)?;
    let resolution = viewbox::resolve(document.view_box(), target, keep_aspect)?;

    let mut raster = Raster::new(resolution.width, resolution.height)?;
    let diagnostics = render_document(&document, resolution.scale, &mut raster)?;

    Ok(Rendering {
	raster,
	resolution,
	diagnostics,
    })
}

/// Draws an already parsed document onto any canvas.
pub fn render_document<C: Canvas>(
    document: &Document,
    scale: ScaleFactors,
    canvas: &mut C,
) -> Result<Vec<Diagnostic>, RenderError> {
    Interpreter::new(canvas, scale).run(document)
}
