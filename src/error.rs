//! Crate-level error type
//!
//! Wraps the error of every pipeline stage so callers that run source text
//! end to end (the binary, [`crate::run_source`]) handle a single type.

use crate::interpreter::errors::RuntimeError;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short name of the failure, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Lex(_) => "Lex",
            Error::Parse(_) => "Parse",
            Error::Runtime(err) => err.kind(),
            Error::Io(_) => "Io",
        }
    }
}
