//! Store error types.

use thiserror::Error;

/// Errors that can occur when writing a question's counters back to its library.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The library has no question with this id.
    #[error("question '{question_id}' not found in library '{library_id}'")]
    QuestionNotFound {
        library_id: String,
        question_id: String,
    },

    /// The stored question is not of the kind the unit expects.
    #[error("question '{question_id}' is not a {expected} question")]
    KindMismatch {
        question_id: String,
        expected: &'static str,
    },

    /// A composite unit points past the end of its parent's rows.
    #[error("row {row} out of range for '{question_id}' ({rows} rows)")]
    RowOutOfRange {
        question_id: String,
        row: usize,
        rows: usize,
    },

    /// The library file has no `[[questions]]` array.
    #[error("library '{0}' has no questions array")]
    MissingQuestions(String),
}
