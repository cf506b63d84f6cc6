use std::collections::HashMap;

use svg_macro::svg_tag;

use crate::types::*;

#[svg_tag]
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    #[tag("svg")]
    Svg(
	#[attr("viewBox")] ViewBox,
    ),
    #[tag("g")]
    Group(
	Id,
    ),
    #[tag("path")]
    Path(
	Id,
	#[attr("d")] Data,
	Fill,
	Stroke,
	StrokeWidth,
    ),
    #[tag("rect")]
    Rectangle(
	Id,
	X,
	Y,
	Width,
	Height,
	Fill,
    ),
    /// Any element the renderer does not draw.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub tag: Tag,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: &str, attributes: &HashMap<String, String>) -> Result<Node, AttributeError> {
	Ok(Node {
	    name: name.to_string(),
	    tag: Tag::from_element(name, attributes)?,
	    children: Vec::new(),
	})
    }

    /// An element that is never drawn, its attributes are left unchecked.
    pub fn skipped(name: &str) -> Node {
	Node {
	    name: name.to_string(),
	    tag: Tag::Other,
	    children: Vec::new(),
	}
    }

    /// Whether the renderer descends into this element's children.
    pub fn draws_children(&self) -> bool {
	matches!(self.tag, Tag::Group(_))
    }
}
