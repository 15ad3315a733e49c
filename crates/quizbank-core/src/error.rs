//! Library error types.
//!
//! Collaborators return `anyhow::Error`; the scheduler downcasts to
//! `LibraryError` to tell a fatal request (an unknown library) apart from a
//! library that merely failed to load and can be skipped.

use thiserror::Error;

/// Errors raised while building or loading libraries.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No library with this id exists.
    #[error("unknown library: {0}")]
    UnknownLibrary(String),

    /// A composite question was given columns of different lengths.
    #[error("composite question '{question_id}' has {column1} cues but {column2} answers")]
    ColumnMismatch {
        question_id: String,
        column1: usize,
        column2: usize,
    },

    /// Two questions in one library share an id.
    #[error("duplicate question id '{question_id}' in library '{library_id}'")]
    DuplicateQuestionId {
        library_id: String,
        question_id: String,
    },
}

impl LibraryError {
    /// Returns `true` if the error should abort scheduler construction
    /// rather than skip the offending library.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LibraryError::UnknownLibrary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unknown_library_is_fatal() {
        assert!(LibraryError::UnknownLibrary("x".into()).is_fatal());
        assert!(!LibraryError::DuplicateQuestionId {
            library_id: "l".into(),
            question_id: "q".into(),
        }
        .is_fatal());
    }

    #[test]
    fn downcasts_through_anyhow() {
        let err: anyhow::Error = LibraryError::UnknownLibrary("bio".into()).into();
        let err = err.context("loading library");
        let lib_err = err.downcast_ref::<LibraryError>().unwrap();
        assert!(lib_err.is_fatal());
        assert_eq!(lib_err.to_string(), "unknown library: bio");
    }
}
