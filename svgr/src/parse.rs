use std::collections::HashMap;
use std::io::Read;

use svg::node::element::tag;
use svg::parser::{Event, Parser};
use tracing::trace;

use crate::error::Error;
use crate::tag::{Node, Tag, attributes};
use crate::types::ViewBox;

/// A parsed document: the root `<svg>` element and everything below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub svg: attributes::Svg,
    pub children: Vec<Node>,
}

impl Document {
    pub fn parse(content: &str) -> Result<Document, Error> {
	let mut events = Parser::new(content);
	let nodes = parse_node(&mut events, Scope::Root)?;

	for node in nodes {
	    if let Tag::Svg(svg) = node.tag {
		return Ok(Document {
		    svg,
		    children: node.children,
		});
	    }
	}

	Err(Error::Malformed(String::from("no <svg> root element")))
    }

    /// Reads the whole stream before parsing.
    pub fn read<R: Read>(mut reader: R) -> Result<Document, Error> {
	let mut content = String::new();
	reader.read_to_string(&mut content)?;

	Document::parse(&content)
    }

    pub fn view_box(&self) -> Option<&ViewBox> {
	self.svg.view_box.as_ref()
    }
}

/// Where an element sits relative to what gets drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope {
    Root,
    Drawn,
    Skipped,
}

impl Scope {
    /// Whether an element named `name` gets its attributes checked: the
    /// root `<svg>` and drawable elements inside it.
    fn checks(self, name: &str) -> bool {
	match self {
	    Scope::Root => name == attributes::Svg::TAG,
	    Scope::Drawn => name != attributes::Svg::TAG,
	    Scope::Skipped => false,
	}
    }

    fn of_children(self, node: &Node) -> Scope {
	match self {
	    Scope::Root if matches!(node.tag, Tag::Svg(_)) => Scope::Drawn,
	    Scope::Drawn if node.draws_children() => Scope::Drawn,
	    _ => Scope::Skipped,
	}
    }
}

fn parse_node(events: &mut Parser<'_>, scope: Scope) -> Result<Vec<Node>, Error> {
    let mut siblings = Vec::new();

    while let Some(event) = events.next() {
	let (name, kind, attributes) = match event {
	    Event::Tag(name, kind, attributes) => (name, kind, attributes),
	    Event::Error(err) => return Err(Error::Malformed(err.to_string())),
	    _ => continue,
	};

	if kind == tag::Type::End {
	    return Ok(siblings);
	}

	let mut node = if !scope.checks(name) {
	    trace!(tag = name, "skipped element");
	    Node::skipped(name)
	} else {
	    let attributes: HashMap<String, String> = attributes
		.iter()
		.map(|(key, value)| (key.clone(), value.to_string()))
		.collect();

	    trace!(tag = name, "parsed element");
	    Node::new(name, &attributes).map_err(|source| Error::Attribute {
		tag: name.to_string(),
		source,
	    })?
	};

	if kind == tag::Type::Start {
	    node.children = parse_node(events, scope.of_children(&node))?;
	}

	siblings.push(node);
    }

    Ok(siblings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueError;

    const TRIANGLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
    <!-- a triangle and a square -->
    <g id="shapes">
	<path d="M0 0 L10 0 L10 10 Z" fill="red"/>
    </g>
    <rect width="10" height="10" fill="#0000ff"/>
    <text x="1" y="1">ignored</text>
</svg>
"##;

    #[test]
    fn test_parse_tree() {
	let document = Document::parse(TRIANGLE).unwrap();

	assert_eq!(document.view_box(), Some(&ViewBox::new(0.0, 0.0, 100.0, 100.0)));

	let names: Vec<&str> = document.children.iter().map(|n| n.name.as_str()).collect();
	assert_eq!(names, vec!["g", "rect", "text"]);

	let group = &document.children[0];
	assert_eq!(group.children.len(), 1);
	assert!(matches!(group.children[0].tag, Tag::Path(_)));
	assert_eq!(document.children[2].tag, Tag::Other);
    }

    #[test]
    fn test_read_stream() {
	let document = Document::read(TRIANGLE.as_bytes()).unwrap();
	assert_eq!(document.children.len(), 3);
    }

    #[test]
    fn test_missing_view_box() {
	let document = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#).unwrap();
	assert_eq!(document.view_box(), None);
    }

    #[test]
    fn test_no_svg_root() {
	assert!(matches!(Document::parse("<g></g>"), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_attribute_errors_name_the_tag() {
	let content = r#"<svg viewBox="0 0 10 10"><path d="M0 0" stroke-width="2.5"/></svg>"#;

	match Document::parse(content) {
	    Err(Error::Attribute { tag, source }) => {
		assert_eq!(tag, "path");
		assert_eq!(source.name, "stroke-width");
		assert_eq!(source.source, ValueError::NotAnInteger("2.5".into()));
	    },
	    other => panic!("unexpected result {:?}", other),
	}
    }

    #[test]
    fn test_undrawn_subtrees_are_not_checked() {
	let content = r#"<svg viewBox="0 0 10 10">
	    <defs><path d="M0 0" stroke-width="2.5"/></defs>
	    <path d="M0 0 L1 1" fill="blue"><rect width="wide"/></path>
	    <svg viewBox="bad"><rect width="wide"/></svg>
	    <g><text><rect width="wide"/></text></g>
	    <rect width="3" height="3"/>
	</svg>"#;
	let document = Document::parse(content).unwrap();

	let names: Vec<&str> = document.children.iter().map(|n| n.name.as_str()).collect();
	assert_eq!(names, vec!["defs", "path", "svg", "g", "rect"]);

	let defs = &document.children[0];
	assert_eq!(defs.tag, Tag::Other);
	assert_eq!(defs.children[0].name, "path");
	assert_eq!(defs.children[0].tag, Tag::Other);

	assert!(matches!(document.children[1].tag, Tag::Path(_)));
	assert_eq!(document.children[1].children[0].tag, Tag::Other);
	assert_eq!(document.children[2].tag, Tag::Other);
	assert_eq!(document.children[3].children[0].children[0].tag, Tag::Other);
	assert!(matches!(document.children[4].tag, Tag::Rectangle(_)));
    }

    #[test]
    fn test_drawn_group_children_are_checked() {
	let content = r#"<svg viewBox="0 0 10 10"><g><g><rect width="wide"/></g></g></svg>"#;
	assert!(matches!(Document::parse(content), Err(Error::Attribute { .. })));
    }

    #[test]
    fn test_malformed_view_box() {
	let content = r#"<svg viewBox="0 0 ten 10"></svg>"#;
	assert!(matches!(Document::parse(content), Err(Error::Attribute { .. })));
    }
}
