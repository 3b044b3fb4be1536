use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::model::{Location, Position};

/// Fatal errors.
///
/// Parsing text never fails; these only come from reading files, applying edits, or
/// restoring scanner state from bytes.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Unrecognized encoding in file: {0}")]
    UnrecognizedEncodingInFile(String),

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("invalid scanner state: {0}")]
    InvalidScannerState(String),
}

impl Error {
    /// Get advice for this error if available.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::UnknownEncoding(..) => Some(
                "Use a WHATWG encoding label such as 'utf-8', 'utf-16le' or 'windows-1252'",
            ),
            Self::UnrecognizedEncodingInFile(..) => Some(
                "Save the file as UTF-8, or pass the encoding explicitly with Options::builder().with_encoding(..)",
            ),
            Self::InvalidEdit(..) => Some(
                "An edit must describe the change from the old source to the new one: start_byte <= old_end_byte and start_byte <= new_end_byte, with the text before start_byte unchanged",
            ),
            Self::Io(..) | Self::File { .. } | Self::InvalidScannerState(..) => None,
        }
    }
}

/// Recoverable problems found while parsing.
///
/// Each one is tied to the construct that was recovered; the tree is still complete
/// and covers the whole input.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    #[error("unterminated {1} block, closed at end of input, position: {0}")]
    UnterminatedBlock(Detail, String),

    #[error("unterminated block comment, closed at end of input, position: {0}")]
    UnterminatedComment(Detail),

    #[error("unterminated table, closed at end of input, position: {0}")]
    UnterminatedTable(Detail),

    #[error("conditional block has no endif directive, position: {0}")]
    MissingEndif(Detail),

    #[error("endif directive without an open conditional block, position: {0}")]
    UnmatchedEndif(Detail),

    #[error("section level mismatch: {1} (expected '{2}'), position: {0}")]
    SectionLevelSkipped(Detail, u8, u8),

    #[error("block metadata is not followed by a block, position: {0}")]
    DetachedMetadata(Detail),

    #[error("nesting deeper than {1} levels, position: {0}")]
    NestingTooDeep(Detail, usize),
}

impl Warning {
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::UnterminatedBlock(detail, ..)
            | Self::UnterminatedComment(detail)
            | Self::UnterminatedTable(detail)
            | Self::MissingEndif(detail)
            | Self::UnmatchedEndif(detail)
            | Self::SectionLevelSkipped(detail, ..)
            | Self::DetachedMetadata(detail)
            | Self::NestingTooDeep(detail, ..) => &detail.location,
        }
    }

    /// Get advice for resolving this warning.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::UnterminatedBlock(..) => {
                "Delimited blocks must be closed with a run of the character that opened them (e.g., '====' to open, '====' or '=====' to close)"
            }
            Self::UnterminatedComment(..) => "Block comments are closed with a '////' line",
            Self::UnterminatedTable(..) => {
                "Tables are closed with the same '|===' line that opened them"
            }
            Self::MissingEndif(..) => {
                "Close conditional blocks with 'endif::[]'; the block extends to the end of the enclosing scope"
            }
            Self::UnmatchedEndif(..) => {
                "Remove the endif directive or add the matching ifdef/ifndef/ifeval"
            }
            Self::SectionLevelSkipped(..) => {
                "Section levels must increment by at most 1. For example, level 2 (==) cannot be followed directly by level 4 (====)"
            }
            Self::DetachedMetadata(..) => {
                "Block titles, anchors and attribute lists must be directly followed by the block they apply to"
            }
            Self::NestingTooDeep(..) => {
                "Reduce the nesting of lists, continuations or conditionals, or raise Options::max_nesting"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub location: Location,
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location {
            start:
                Position {
                    line: start_line,
                    column: start_column,
                },
            end:
                Position {
                    line: end_line,
                    column: end_column,
                },
            ..
        } = self.location;

        write!(
            f,
            "start(line: {start_line}, column: {start_column}), end(line: {end_line}, column: {end_column})",
        )
    }
}
