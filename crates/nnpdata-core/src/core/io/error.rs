use crate::core::models::error::ModelError;
use crate::core::units::UnitError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("Unexpected end of file while reading {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("Inconsistent data: {0}")]
    Inconsistency(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Units(#[from] UnitError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Invalid integer for {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },

    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },

    #[error("Missing required field {field}")]
    MissingField { field: &'static str },

    #[error("Unexpected record '{found}', expected {expected}")]
    UnexpectedRecord {
        found: String,
        expected: &'static str,
    },

    #[error("Unknown species for atom type '{0}'")]
    UnknownType(String),
}

impl FormatError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { line, kind }
    }
}
