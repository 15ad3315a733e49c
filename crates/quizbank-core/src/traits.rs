//! Collaborator traits for loading libraries and persisting answers.
//!
//! These are implemented by the `quizbank-store` crate. The scheduler takes
//! them as explicit constructor arguments.

use crate::model::{Library, Question};

/// Source of libraries, keyed by library id.
pub trait LibrarySource: Send + Sync {
    /// Load a library.
    ///
    /// Implementations should return [`crate::error::LibraryError::UnknownLibrary`]
    /// when no library with this id exists, and any other error when it exists
    /// but cannot be read.
    fn load(&self, id: &str) -> anyhow::Result<Library>;

    /// Ids of every library this source can load.
    fn list(&self) -> anyhow::Result<Vec<String>>;
}

/// Destination for a unit's updated counters after it has been scored.
pub trait QuestionStore: Send + Sync {
    /// Persist the counters of `question` back into its library.
    fn save(&self, question: &Question) -> anyhow::Result<()>;
}

/// A store that discards everything, for plan-only sessions.
pub struct NoopStore;

impl QuestionStore for NoopStore {
    fn save(&self, _: &Question) -> anyhow::Result<()> {
        Ok(())
    }
}
