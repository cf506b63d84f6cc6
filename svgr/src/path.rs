use svg::node::element::path::{Command as DataCommand, Data, Position};

use crate::types::ValueError;

/// One drawing command, `symbol` keeps its case: upper case is absolute,
/// lower case relative.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub symbol: char,
    pub params: Vec<f64>,
}

impl Command {
    pub fn new(symbol: char, params: Vec<f64>) -> Self {
	Command { symbol, params }
    }

    /// Number of parameters one command of this kind takes.
    pub fn arity(symbol: char) -> Option<usize> {
	Some(match symbol.to_ascii_uppercase() {
	    'M' | 'L' | 'T' => 2,
	    'H' | 'V' => 1,
	    'C' => 6,
	    'Q' | 'S' => 4,
	    'A' => 7,
	    'Z' => 0,
	    _ => return None,
	})
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

fn symbol(upper: char, position: &Position) -> char {
    match position {
	Position::Absolute => upper,
	Position::Relative => upper.to_ascii_lowercase(),
    }
}

impl Path {
    /// Parses path data (the `d` attribute).
    ///
    /// Parameter groups repeated after a command letter become separate
    /// commands; extra pairs after a move are lines of the same case.
    pub fn parse(data: &str) -> Result<Path, ValueError> {
	let parsed = Data::parse(data).map_err(|err| ValueError::MalformedPathData(err.to_string()))?;
	let mut path = Path::default();

	for command in parsed.iter() {
	    let (symbol, params) = match command {
		DataCommand::Move(pos, p) => (symbol('M', pos), p),
		DataCommand::Line(pos, p) => (symbol('L', pos), p),
		DataCommand::HorizontalLine(pos, p) => (symbol('H', pos), p),
		DataCommand::VerticalLine(pos, p) => (symbol('V', pos), p),
		DataCommand::QuadraticCurve(pos, p) => (symbol('Q', pos), p),
		DataCommand::SmoothQuadraticCurve(pos, p) => (symbol('T', pos), p),
		DataCommand::CubicCurve(pos, p) => (symbol('C', pos), p),
		DataCommand::SmoothCubicCurve(pos, p) => (symbol('S', pos), p),
		DataCommand::EllipticalArc(pos, p) => (symbol('A', pos), p),
		DataCommand::Close => {
		    path.push(Command::new('Z', Vec::new()));
		    continue;
		},
	    };

	    let arity = Command::arity(symbol).unwrap_or(1);
	    if params.is_empty() || params.len() % arity != 0 {
		return Err(ValueError::MalformedPathData(format!(
		    "`{}` takes parameters in groups of {}, got {}",
		    symbol,
		    arity,
		    params.len()
		)));
	    }

	    for (i, group) in params.chunks(arity).enumerate() {
		let symbol = match symbol {
		    'M' if i > 0 => 'L',
		    'm' if i > 0 => 'l',
		    s => s,
		};
		path.push(Command::new(symbol, group.iter().map(|&v| f64::from(v)).collect()));
	    }
	}

	Ok(path)
    }

    fn push(&mut self, command: Command) {
	let starts_subpath = matches!(command.symbol, 'M' | 'm');

	match self.subpaths.last_mut() {
	    Some(subpath) if !starts_subpath => subpath.commands.push(command),
	    _ => self.subpaths.push(Subpath { commands: vec![command] }),
	}
    }
}
