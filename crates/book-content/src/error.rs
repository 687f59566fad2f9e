//! Error types for the book-content crate.
//!
//! Bundle parsing and validation failures are reported through a single
//! semantic enum so callers can tell a malformed file apart from a bundle that
//! parses but breaks a structural rule.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a content bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The bundle file could not be read.
    #[error("failed to read content bundle at '{path}': {message}")]
    IoError {
        /// Path to the bundle file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The bundle JSON is malformed or missing required fields.
    #[error("invalid content bundle JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The bundle version is not supported.
    #[error("unsupported content bundle version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the bundle.
        actual: u32,
    },

    /// The bundle contains no chapters.
    #[error("content bundle contains no chapters")]
    EmptyChapters,

    /// Two chapters share the same number.
    #[error("duplicate chapter number {number}")]
    DuplicateChapter {
        /// The repeated chapter number.
        number: u16,
    },

    /// Two entries of the same kind share an identifier.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Entry kind (`prompt`, `exercise`, or `template`).
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },

    /// An entry references a chapter that is not in the bundle.
    #[error("{kind} '{id}' references unknown chapter {chapter_number}")]
    UnknownChapter {
        /// Entry kind (`prompt` or `exercise`).
        kind: &'static str,
        /// Identifier of the offending entry.
        id: String,
        /// The chapter number that could not be resolved.
        chapter_number: u16,
    },

    /// An exercise field configuration is structurally invalid.
    #[error("exercise '{exercise_id}' field '{field_id}' is invalid: {reason}")]
    InvalidField {
        /// Exercise containing the field.
        exercise_id: String,
        /// Field identifier.
        field_id: String,
        /// Why the configuration was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_version_formats_correctly() {
        let err = ContentError::UnsupportedVersion {
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "unsupported content bundle version: expected 1, found 3"
        );
    }

    #[test]
    fn unknown_chapter_formats_correctly() {
        let err = ContentError::UnknownChapter {
            kind: "prompt",
            id: "ch9-kickoff".to_owned(),
            chapter_number: 9,
        };
        assert_eq!(
            err.to_string(),
            "prompt 'ch9-kickoff' references unknown chapter 9"
        );
    }

    #[test]
    fn invalid_field_formats_correctly() {
        let err = ContentError::InvalidField {
            exercise_id: "ex-1".to_owned(),
            field_id: "confidence".to_owned(),
            reason: "scale minimum must be below maximum".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "exercise 'ex-1' field 'confidence' is invalid: scale minimum must be below maximum"
        );
    }
}
