//! quizbank-core — Adaptive question scheduling for study sessions.
//!
//! This crate defines the question data model, the correctness bands, the
//! question pool and bias schedule, and the `Scheduler` that ties them
//! together. Library storage lives behind the traits in [`traits`].

pub mod bias;
pub mod classify;
pub mod decompose;
pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod pool;
pub mod scheduler;
pub mod stats;
pub mod traits;

pub use classify::{correctness, Band, BAND_COUNT};
pub use error::LibraryError;
pub use model::{Library, LibraryQuestion, Question};
pub use scheduler::{Scheduler, SchedulerOptions, SessionState};
