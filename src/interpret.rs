use std::fmt;

use svgr::{Color, Command, Document, Node, Paint, Path, Tag, attributes};
use tracing::{debug, trace, warn};

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::viewbox::ScaleFactors;

/// Something skipped while drawing that did not stop the render.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    UnsupportedCommand { symbol: char },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    Diagnostic::UnsupportedCommand { symbol } => write!(f, "path command `{}` is unimplemented", symbol),
	}
    }
}

/// Walks a document depth-first and draws it on a canvas.
pub struct Interpreter<'c, C: Canvas> {
    canvas: &'c mut C,
    scale: ScaleFactors,
    diagnostics: Vec<Diagnostic>,
}

impl<'c, C: Canvas> Interpreter<'c, C> {
    pub fn new(canvas: &'c mut C, scale: ScaleFactors) -> Self {
	Interpreter {
	    canvas,
	    scale,
	    diagnostics: Vec::new(),
	}
    }

    /// Draws every element of `document`. Stops at the first error, leaving
    /// whatever was already drawn on the canvas.
    pub fn run(mut self, document: &Document) -> Result<Vec<Diagnostic>, RenderError> {
	self.visit(&document.children)?;
	Ok(self.diagnostics)
    }

    fn visit(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
	for node in nodes {
	    match &node.tag {
		Tag::Group(group) => {
		    trace!(id = ?group.id, "entering group");
		    self.visit(&node.children)?
		},
		Tag::Rectangle(rect) => self.draw_rect(rect)?,
		Tag::Path(path) => self.draw_path(path)?,
		Tag::Svg(_) | Tag::Other => trace!(tag = node.name.as_str(), "skipping element"),
	    }
	}

	Ok(())
    }

    fn draw_rect(&mut self, rect: &attributes::Rectangle) -> Result<(), RenderError> {
	let missing = |name| RenderError::MissingAttribute { tag: attributes::Rectangle::TAG, name };
	let width = rect.width.ok_or_else(|| missing("width"))?;
	let height = rect.height.ok_or_else(|| missing("height"))?;
	let x = rect.x.unwrap_or_default();
	let y = rect.y.unwrap_or_default();

	let ScaleFactors { x: sx, y: sy } = self.scale;
	debug!(id = ?rect.id, ?x, ?y, ?width, ?height, "rect");
	self.canvas.rectangle(x.px() * sx, y.px() * sy, width.px() * sx, height.px() * sy);

	// without a fill the rectangle is never painted
	if let Some(fill) = &rect.fill {
	    self.set_paint(fill);
	    self.canvas.fill();
	}

	self.canvas.new_path();
	Ok(())
    }

    fn draw_path(&mut self, path: &attributes::Path) -> Result<(), RenderError> {
	debug!(id = ?path.id, subpaths = path.data.as_ref().map_or(0, |d| d.subpaths.len()), "path");
	if let Some(data) = &path.data {
	    self.walk(data)?;
	}

	self.canvas.set_color(Color::BLACK);
	if let Some(fill) = &path.fill {
	    self.set_paint(fill);
	}
	self.canvas.fill();

	if let Some(width) = path.stroke_width {
	    self.canvas.set_line_width(width as f64);
	}
	if let Some(stroke) = &path.stroke {
	    self.set_paint(stroke);
	    self.canvas.stroke();
	}

	self.canvas.new_path();
	Ok(())
    }

    fn set_paint(&mut self, paint: &Paint) {
	if let Paint::Unknown(name) = paint {
	    warn!(color = name.as_str(), "unknown color name, painting transparent");
	}
	self.canvas.set_color(paint.color());
    }

    /// Emits every subpath, then closes the path once more.
    fn walk(&mut self, path: &Path) -> Result<(), RenderError> {
	for subpath in &path.subpaths {
	    for command in &subpath.commands {
		self.apply(command)?;
	    }
	}

	self.canvas.close_path();
	Ok(())
    }

    fn apply(&mut self, command: &Command) -> Result<(), RenderError> {
	let symbol = command.symbol;
	let expected = match Command::arity(symbol) {
	    Some(n) => n,
	    None => {
		self.unsupported(symbol);
		return Ok(());
	    },
	};
	let p = &command.params;
	if p.len() < expected {
	    return Err(RenderError::MissingParameters { symbol, expected, got: p.len() });
	}

	let ScaleFactors { x: sx, y: sy } = self.scale;

	match symbol {
	    'M' => self.canvas.move_to(p[0] * sx, p[1] * sy),
	    'm' => {
		if let Some((x, y)) = self.canvas.current_point() {
		    self.canvas.move_to(x + p[0] * sx, y + p[1] * sy);
		}
	    },
	    'L' => self.canvas.line_to(p[0] * sx, p[1] * sy),
	    'l' => {
		if let Some((x, y)) = self.canvas.current_point() {
		    self.canvas.line_to(x + p[0] * sx, y + p[1] * sy);
		}
	    },
	    'H' => {
		let y = self.canvas.current_point().map_or(0.0, |(_, y)| y);
		self.canvas.line_to(p[0] * sx, y);
	    },
	    'h' => {
		if let Some((x, y)) = self.canvas.current_point() {
		    self.canvas.line_to(x + p[0] * sx, y);
		}
	    },
	    'V' => {
		let x = self.canvas.current_point().map_or(0.0, |(x, _)| x);
		self.canvas.line_to(x, p[0] * sy);
	    },
	    'v' => {
		if let Some((x, y)) = self.canvas.current_point() {
		    self.canvas.line_to(x, y + p[0] * sy);
		}
	    },
	    'Z' | 'z' => self.canvas.close_path(),
	    'C' => self.canvas.cubic_to(p[0] * sx, p[1] * sy, p[2] * sx, p[3] * sy, p[4] * sx, p[5] * sy),
	    other => self.unsupported(other),
	}

	Ok(())
    }

    fn unsupported(&mut self, symbol: char) {
	warn!(%symbol, "path command is unimplemented");
	self.diagnostics.push(Diagnostic::UnsupportedCommand { symbol });
    }
}
