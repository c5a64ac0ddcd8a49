//! DyeScript Parser
//!
//! Turns DyeScript source text into [`ParsedSource`] statement records.

pub mod error;
pub mod lexer;

pub use error::{ParseError, ParseResult, SourceLocation};
pub use lexer::Lexer;

/// One parsed statement: its raw tokens and where it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    /// Raw tokens, in source order
    pub content: Vec<String>,
    /// Location of the first token
    pub index: SourceLocation,
}

impl ParsedSource {
    pub fn new(content: Vec<String>, index: SourceLocation) -> Self {
        Self { content, index }
    }

    /// Build a statement from string slices (handy for embedding and tests)
    pub fn from_tokens<I, S>(tokens: I, index: SourceLocation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tokens.into_iter().map(Into::into).collect(), index)
    }
}

/// Lex a whole DyeScript source into statements
pub fn parse(input: &str) -> ParseResult<Vec<ParsedSource>> {
    Lexer::new(input).statements()
}
