use super::ast::AbstractSyntaxTree;
use thiserror::Error;
pub mod pattern_pest_parser;

/// Errors raised while turning pattern source text into an AbstractSyntaxTree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The source does not follow the pattern grammar.
    #[error("Syntax Error: {0}")]
    Syntax(String),

    /// The grammar accepted the source but produced a tree the parser does not expect.
    #[error("Unexpected parse tree: {0}")]
    UnexpectedShape(String)
}

/// Parser handles interpretation of pattern source text into the intermediate
/// representation. Put another way the parser turns a source string into an
/// abstract syntax tree.
pub trait AstParser {
    /// Creates a default configuration of an AstParser
    fn default() -> Self;

    /// Parse a source string into an Abstract Syntax Tree
    fn parse(&self, source: &str) -> Result<AbstractSyntaxTree, ParseError>;
}

// Concrete Definition Export
pub use self::pattern_pest_parser::PestPatternParser;
