use std::io;

use thiserror::Error;

use crate::types::AttributeError;

/// Errors produced while reading a document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("malformed document: <{tag}>: {source}")]
    Attribute {
	tag: String,
	#[source]
	source: AttributeError,
    },

    #[error("failed to read document: {0}")]
    Io(#[from] io::Error),
}
