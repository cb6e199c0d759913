/// Errors of formula parsing and molar mass evaluation.
///
/// Every failure is an ordinary outcome of user input, so errors are plain values
/// carrying enough detail (character, 0-based position, symbol) for a caller to
/// point at the problem.
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,
    #[error("formula contains no elements")]
    NoElements,
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("unclosed parenthesis '(' at position {position}")]
    UnclosedGroup { position: usize },
    #[error("zero count at position {position}")]
    ZeroCount { position: usize },
    #[error("count too large at position {position}")]
    CountOverflow { position: usize },
    #[error("unknown element: {0}")]
    UnknownElement(String),
    #[error("formula is {length} characters long, limit is {max}")]
    TooLong { length: usize, max: usize },
    #[error("nesting depth limit {max} exceeded at position {position}")]
    TooDeep { position: usize, max: usize },
}

/// rejected definition of a chemical group abbreviation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("invalid group name '{0}': must be an uppercase letter followed by lowercase letters")]
    InvalidName(String),
    #[error("group '{0}' contains no atoms")]
    EmptyComposition(String),
    #[error("group '{group}' has zero atoms of {symbol}")]
    ZeroCount { group: String, symbol: String },
    #[error("group '{group}' contains unknown element: {symbol}")]
    UnknownElement { group: String, symbol: String },
}

/// coarse classification of [`FormulaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Empty,
    Syntax,
    UnknownElement,
    Limit,
}

impl ErrorKind {
    /// stable code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Empty => "EMPTY",
            ErrorKind::Syntax => "SYNTAX",
            ErrorKind::UnknownElement => "UNKNOWN_ELEMENT",
            ErrorKind::Limit => "LIMIT",
        }
    }
}

impl FormulaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Empty | FormulaError::NoElements => ErrorKind::Empty,
            FormulaError::UnexpectedCharacter { .. }
            | FormulaError::UnclosedGroup { .. }
            | FormulaError::ZeroCount { .. }
            | FormulaError::CountOverflow { .. } => ErrorKind::Syntax,
            FormulaError::UnknownElement(_) => ErrorKind::UnknownElement,
            FormulaError::TooLong { .. } | FormulaError::TooDeep { .. } => ErrorKind::Limit,
        }
    }

    /// 0-based character index the error points at, if it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            FormulaError::UnexpectedCharacter { position, .. }
            | FormulaError::UnclosedGroup { position }
            | FormulaError::ZeroCount { position }
            | FormulaError::CountOverflow { position }
            | FormulaError::TooDeep { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// failure value of the output contract: `{ "error": ..., "code": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl From<&FormulaError> for ErrorReport {
    fn from(error: &FormulaError) -> Self {
        ErrorReport {
            error: error.to_string(),
            code: error.kind().code(),
            position: error.position(),
        }
    }
}
