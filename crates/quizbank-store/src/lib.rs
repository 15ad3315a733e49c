//! quizbank-store — Library storage and configuration.
//!
//! Implements the `LibrarySource` and `QuestionStore` traits for TOML files
//! on disk and for in-memory libraries, and loads `quizbank.toml`.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;

pub use config::{load_config, load_config_from, QuizbankConfig};
pub use error::StoreError;
pub use fs::FsLibraryStore;
pub use memory::MemoryStore;
