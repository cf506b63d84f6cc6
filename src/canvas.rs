use std::convert::TryFrom;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use svgr::Color;

use crate::error::RenderError;

/// Drawing primitives the interpreter emits.
///
/// `fill` and `stroke` keep the current path, `new_path` drops it along
/// with the current point.
pub trait Canvas {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);
    fn close_path(&mut self);
    fn current_point(&self) -> Option<(f64, f64)>;
    fn set_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn new_path(&mut self);
}

/// A cairo image surface and the context drawing on it.
pub struct Raster {
    surface: ImageSurface,
    context: Context,
    width: u32,
    height: u32,
}

impl Raster {
    /// Transparent ARGB32 surface with a line width of one pixel.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
	let too_large = || RenderError::TargetTooLarge { width, height };
	let w = i32::try_from(width).map_err(|_| too_large())?;
	let h = i32::try_from(height).map_err(|_| too_large())?;

	let surface = ImageSurface::create(Format::ARgb32, w, h).map_err(RenderError::Surface)?;
	let context = Context::new(&surface);
	context.set_line_width(1.0);

	Ok(Raster { surface, context, width, height })
    }

    pub fn width(&self) -> u32 {
	self.width
    }

    pub fn height(&self) -> u32 {
	self.height
    }

    pub fn write_png<W: Write>(&self, stream: &mut W) -> Result<(), RenderError> {
	self.surface.flush();
	self.surface
	    .write_to_png(stream)
	    .map_err(|err| RenderError::Png(format!("{:?}", err)))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
	let mut file = File::create(path)?;
	self.write_png(&mut file)
    }

    /// Releases the context so the pixel data can be borrowed.
    pub fn into_surface(self) -> ImageSurface {
	let Raster { surface, context, .. } = self;
	drop(context);
	surface.flush();
	surface
    }
}

impl Canvas for Raster {
    fn move_to(&mut self, x: f64, y: f64) {
	self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
	self.context.line_to(x, y);
    }

    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
	self.context.curve_to(x1, y1, x2, y2, x3, y3);
    }

    fn close_path(&mut self) {
	self.context.close_path();
    }

    fn current_point(&self) -> Option<(f64, f64)> {
	if self.context.has_current_point() {
	    Some(self.context.get_current_point())
	} else {
	    None
	}
    }

    fn set_color(&mut self, color: Color) {
	let (r, g, b, a) = color.to_f64();
	self.context.set_source_rgba(r, g, b, a);
    }

    fn set_line_width(&mut self, width: f64) {
	self.context.set_line_width(width);
    }

    fn fill(&mut self) {
	self.context.fill_preserve();
    }

    fn stroke(&mut self) {
	self.context.stroke_preserve();
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
	self.context.rectangle(x, y, width, height);
    }

    fn new_path(&mut self) {
	self.context.new_path();
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
	MoveTo(f64, f64),
	LineTo(f64, f64),
	CubicTo(f64, f64, f64, f64, f64, f64),
	ClosePath,
	SetColor(Color),
	SetLineWidth(f64),
	Fill,
	Stroke,
	Rectangle(f64, f64, f64, f64),
	NewPath,
    }

    /// Records every primitive and tracks the current point the way cairo does.
    #[derive(Debug, Default)]
    pub struct Recorder {
	pub ops: Vec<Op>,
	current: Option<(f64, f64)>,
	subpath_start: Option<(f64, f64)>,
    }

    impl Recorder {
	pub fn new() -> Self {
	    Recorder::default()
	}

	/// Recorded geometry, without color or paint operations.
	pub fn geometry(&self) -> Vec<Op> {
	    self.ops
		.iter()
		.filter(|op| {
		    !matches!(op, Op::SetColor(_) | Op::SetLineWidth(_) | Op::Fill | Op::Stroke | Op::NewPath)
		})
		.cloned()
		.collect()
	}
    }

    impl Canvas for Recorder {
	fn move_to(&mut self, x: f64, y: f64) {
	    self.ops.push(Op::MoveTo(x, y));
	    self.current = Some((x, y));
	    self.subpath_start = Some((x, y));
	}

	fn line_to(&mut self, x: f64, y: f64) {
	    self.ops.push(Op::LineTo(x, y));
	    if self.current.is_none() {
		self.subpath_start = Some((x, y));
	    }
	    self.current = Some((x, y));
	}

	fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
	    self.ops.push(Op::CubicTo(x1, y1, x2, y2, x3, y3));
	    if self.current.is_none() {
		self.subpath_start = Some((x1, y1));
	    }
	    self.current = Some((x3, y3));
	}

	fn close_path(&mut self) {
	    self.ops.push(Op::ClosePath);
	    self.current = self.subpath_start;
	}

	fn current_point(&self) -> Option<(f64, f64)> {
	    self.current
	}

	fn set_color(&mut self, color: Color) {
	    self.ops.push(Op::SetColor(color));
	}

	fn set_line_width(&mut self, width: f64) {
	    self.ops.push(Op::SetLineWidth(width));
	}

	fn fill(&mut self) {
	    self.ops.push(Op::Fill);
	}

	fn stroke(&mut self) {
	    self.ops.push(Op::Stroke);
	}

	fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
	    self.ops.push(Op::Rectangle(x, y, width, height));
	    self.current = Some((x, y));
	    self.subpath_start = Some((x, y));
	}

	fn new_path(&mut self) {
	    self.ops.push(Op::NewPath);
	    self.current = None;
	    self.subpath_start = None;
	}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_current_point() {
	let mut raster = Raster::new(10, 10).unwrap();
	assert_eq!(raster.current_point(), None);

	raster.move_to(2.0, 3.0);
	raster.line_to(5.0, 3.0);
	assert_eq!(raster.current_point(), Some((5.0, 3.0)));

	raster.close_path();
	assert_eq!(raster.current_point(), Some((2.0, 3.0)));

	raster.new_path();
	assert_eq!(raster.current_point(), None);
    }

    #[test]
    fn test_oversized_raster() {
	assert!(matches!(
	    Raster::new(u32::MAX, 10),
	    Err(RenderError::TargetTooLarge { width: u32::MAX, height: 10 })
	));
    }

    #[test]
    fn test_write_png() {
	let raster = Raster::new(4, 3).unwrap();
	let mut png = Vec::new();
	raster.write_png(&mut png).unwrap();

	assert_eq!(&png[1..4], b"PNG");
	assert_eq!((raster.width(), raster.height()), (4, 3));
    }
}
