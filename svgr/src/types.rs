use nom::{
    Finish, IResult,
    branch::alt,
    character::complete::{alpha0, char, multispace0, multispace1},
    combinator::{all_consuming, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair},
};
use thiserror::Error;

use crate::color::Paint;
use crate::path::Path;

pub const PIXELS_PER_INCH: f64 = 96.0;

/// Why a single attribute value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("expected an integer, got {0:?}")]
    NotAnInteger(String),

    #[error("unsupported unit in {0:?}")]
    UnsupportedUnit(String),

    #[error("invalid color format {0:?}, must be #RGB or #RRGGBB")]
    InvalidColorFormat(String),

    #[error("malformed viewBox {0:?}")]
    MalformedViewBox(String),

    #[error("malformed path data: {0}")]
    MalformedPathData(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid `{name}` attribute: {source}")]
pub struct AttributeError {
    pub name: &'static str,
    #[source]
    pub source: ValueError,
}

/// Conversion of a raw attribute string into a typed value.
pub trait FromAttribute: Sized {
    fn from_attribute(raw: &str) -> Result<Self, ValueError>;
}

impl FromAttribute for String {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	Ok(raw.to_string())
    }
}

impl FromAttribute for i64 {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	let trimmed = raw.trim();

	trimmed.parse().map_err(|_| match trimmed.parse::<f64>() {
	    Ok(_) => ValueError::NotAnInteger(raw.to_string()),
	    Err(_) => ValueError::InvalidNumber(raw.to_string()),
	})
    }
}

impl FromAttribute for Paint {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	raw.parse()
    }
}

impl FromAttribute for Path {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	Path::parse(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
	ViewBox { x, y, width, height }
    }
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
	value((), delimited(multispace0, char(','), multispace0)),
	value((), multispace1),
    ))(input)
}

fn number_list(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(multispace0, separated_list1(separator, double), multispace0)(input)
}

impl FromAttribute for ViewBox {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	let err = || ValueError::MalformedViewBox(raw.to_string());
	let (_, numbers) = all_consuming(number_list)(raw).finish().map_err(|_| err())?;

	match numbers.as_slice() {
	    [x, y, width, height] => Ok(ViewBox::new(*x, *y, *width, *height)),
	    _ => Err(err()),
	}
    }
}

/// A length in whole pixels.
///
/// Accepts a bare integer, an integral `px` value or inches (`3.5in`),
/// converted at [`PIXELS_PER_INCH`] and truncated. Other units are
/// rejected instead of read as zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Length(pub i64);

impl Length {
    pub fn px(self) -> f64 {
	self.0 as f64
    }
}

fn number_with_unit(input: &str) -> IResult<&str, (f64, &str)> {
    all_consuming(pair(double, alpha0))(input)
}

impl FromAttribute for Length {
    fn from_attribute(raw: &str) -> Result<Self, ValueError> {
	let trimmed = raw.trim();
	if let Ok(px) = trimmed.parse::<i64>() {
	    return Ok(Length(px));
	}

	let (_, (number, unit)) = number_with_unit(trimmed)
	    .finish()
	    .map_err(|_| ValueError::InvalidNumber(raw.to_string()))?;

	match unit {
	    "" | "px" if number.fract() == 0.0 => Ok(Length(number as i64)),
	    "" | "px" => Err(ValueError::NotAnInteger(raw.to_string())),
	    "in" => Ok(Length((number * PIXELS_PER_INCH) as i64)),
	    _ => Err(ValueError::UnsupportedUnit(raw.to_string())),
	}
    }
}

pub type Id = String;

pub type X = Length;
pub type Y = Length;
pub type Width = Length;
pub type Height = Length;

pub type Fill = Paint;
pub type Stroke = Paint;
pub type StrokeWidth = i64;

pub type Data = Path;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_box() {
	assert_eq!(ViewBox::from_attribute("0 0 100 100"), Ok(ViewBox::new(0.0, 0.0, 100.0, 100.0)));
	assert_eq!(ViewBox::from_attribute(" -5,10  24.5 32 "), Ok(ViewBox::new(-5.0, 10.0, 24.5, 32.0)));
    }

    #[test]
    fn test_view_box_malformed() {
	for raw in &["", "0 0 100", "0 0 100 100 5", "0 0 wide 100"] {
	    assert_eq!(
		ViewBox::from_attribute(raw),
		Err(ValueError::MalformedViewBox(raw.to_string())),
		"{:?}",
		raw
	    );
	}
    }

    #[test]
    fn test_length_units() {
	assert_eq!(Length::from_attribute("10"), Ok(Length(10)));
	assert_eq!(Length::from_attribute("12px"), Ok(Length(12)));
	assert_eq!(Length::from_attribute("1in"), Ok(Length(96)));
	assert_eq!(Length::from_attribute("3.55in"), Ok(Length(340)));
    }

    #[test]
    fn test_length_rejects() {
	assert_eq!(Length::from_attribute("2.5"), Err(ValueError::NotAnInteger("2.5".into())));
	assert_eq!(Length::from_attribute("2cm"), Err(ValueError::UnsupportedUnit("2cm".into())));
	assert_eq!(Length::from_attribute("wide"), Err(ValueError::InvalidNumber("wide".into())));
    }

    #[test]
    fn test_integer_attribute() {
	assert_eq!(i64::from_attribute("2"), Ok(2));
	assert_eq!(i64::from_attribute("2.5"), Err(ValueError::NotAnInteger("2.5".into())));
	assert_eq!(i64::from_attribute("thick"), Err(ValueError::InvalidNumber("thick".into())));
    }
}
