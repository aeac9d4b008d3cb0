use logos::Span;
use thiserror::Error;

use crate::parse::Token;

/// Errors that can occur while parsing or executing dCBOR patterns.
#[derive(Debug, Clone, Error, PartialEq, Default)]
pub enum Error {
    #[error("Empty input")]
    EmptyInput,

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Extra data at end of input at {0:?}")]
    ExtraData(Span),

    #[error("Unexpected token {0:?} at {1:?}")]
    UnexpectedToken(Box<Token>, Span),

    #[error("Unrecognized token at {0:?}")]
    UnrecognizedToken(Span),

    #[error("Expected opening parenthesis at {0:?}")]
    ExpectedOpenParen(Span),

    #[error("Expected closing parenthesis at {0:?}")]
    ExpectedCloseParen(Span),

    #[error("Expected closing bracket at {0:?}")]
    ExpectedCloseBracket(Span),

    #[error("Expected closing brace at {0:?}")]
    ExpectedCloseBrace(Span),

    #[error("Expected colon at {0:?}")]
    ExpectedColon(Span),

    #[error("Expected pattern after operator at {0:?}")]
    ExpectedPattern(Span),

    #[error("Unmatched parentheses at {0:?}")]
    UnmatchedParentheses(Span),

    #[error("Unmatched braces at {0:?}")]
    UnmatchedBraces(Span),

    #[error("Unterminated string literal at {0:?}")]
    UnterminatedString(Span),

    #[error("Unterminated regex pattern at {0:?}")]
    UnterminatedRegex(Span),

    #[error("Invalid regex pattern at {0:?}")]
    InvalidRegex(Span),

    #[error("Invalid hex string at {0:?}")]
    InvalidHexString(Span),

    #[error("Unterminated hex string at {0:?}")]
    UnterminatedHexString(Span),

    #[error("Invalid number format at {0:?}")]
    InvalidNumberFormat(Span),

    #[error("Invalid range at {0:?}")]
    InvalidRange(Span),

    #[error("Invalid date format at {0:?}")]
    InvalidDateFormat(Span),

    #[error("Unterminated date-quoted literal at {0:?}")]
    UnterminatedDateQuoted(Span),

    #[error("Invalid digest pattern at {0:?}")]
    InvalidDigestPattern(Span),

    #[error("Unterminated digest-quoted literal at {0:?}")]
    UnterminatedDigestQuoted(Span),

    #[error("Invalid capture group name {0:?} at {1:?}")]
    InvalidCaptureGroupName(String, Span),

    /// Runtime guard: the VM or direct matcher exceeded a caller-supplied
    /// step budget. Deliberately outside the parse-error taxonomy above.
    #[error("Execution aborted after exceeding the configured step budget")]
    ExecutionAborted,

    #[error("Unknown error")]
    #[default]
    Unknown,
}

/// A `Result` type specialized for dCBOR pattern parsing and matching.
pub type Result<T> = std::result::Result<T, Error>;
