//! Error kinds surfaced by the conversion pipeline.
//!
//! Every failure aborts the current conversion. Variants carry the offending
//! input fragment and the 1-based input line so callers can branch on kind
//! instead of parsing messages.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Chorus nesting rules were violated.
    #[error("line {line}: {kind}")]
    Structure { line: usize, kind: StructureError },

    #[error("line {line}: unknown directive `{key}`")]
    UnknownCommand { line: usize, key: String },

    #[error("line {line}: {source}")]
    Definition {
        line: usize,
        #[source]
        source: DefinitionError,
    },

    #[error("line {line}: invalid font size `{value}`")]
    InvalidFontSize { line: usize, value: String },

    /// A chord was placed above lyrics but neither the song nor the default
    /// table defines it.
    #[error("chord `{name}` is used but has no definition")]
    UndefinedChord { name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration format error: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("start of chorus inside the chorus opened at line {opened_at}")]
    NestedChorus { opened_at: usize },

    #[error("end of chorus without a matching start")]
    UnmatchedEndOfChorus,

    #[error("chorus opened at line {opened_at} is never closed")]
    UnterminatedSection { opened_at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("malformed chord definition `{definition}`: {reason}")]
    Malformed {
        definition: String,
        reason: &'static str,
    },

    #[error("chord `{name}` uses fret {fret}, above the maximum of {max}")]
    FretTooHigh { name: String, fret: u32, max: u32 },

    #[error("chord `{name}` defines {found} strings, expected {expected}")]
    StringCount {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl Error {
    /// The input line the error points at, when it came from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Structure { line, .. }
            | Error::UnknownCommand { line, .. }
            | Error::Definition { line, .. }
            | Error::InvalidFontSize { line, .. } => Some(*line),
            _ => None,
        }
    }
}
