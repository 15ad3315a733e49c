//! The adaptive question scheduler.
//!
//! Loads libraries, expands them into units, fills the pool, and serves one
//! unit per call following the bias schedule. A scheduler covers exactly one
//! quiz session; start a new one to re-partition from fresh correctness data.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::bias::BiasWalker;
use crate::classify::{Band, BAND_COUNT};
use crate::decompose;
use crate::error::LibraryError;
use crate::model::{Library, Question};
use crate::pool::Pool;
use crate::traits::{LibrarySource, QuestionStore};

/// Construction-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Partition by correctness and shuffle each band. When `false`, units
    /// are served in library order.
    pub randomized: bool,
    /// Seed for the shuffle. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            randomized: true,
            seed: None,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Constructed, nothing served yet.
    Idle,
    /// At least one unit served, more remain.
    Serving,
    /// The pool is empty.
    Exhausted,
}

/// Serves questions for a single quiz session.
pub struct Scheduler {
    pool: Pool,
    walker: BiasWalker,
    randomized: bool,
    libraries_used: Vec<String>,
    served: usize,
    store: Arc<dyn QuestionStore>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pool", &self.pool.band_sizes())
            .field("cursor", &self.walker.cursor())
            .field("randomized", &self.randomized)
            .field("libraries_used", &self.libraries_used)
            .field("served", &self.served)
            .finish()
    }
}

impl Scheduler {
    /// Load the given libraries and build the pool.
    ///
    /// A library that fails to load is logged and skipped. An id the source
    /// does not know at all aborts construction. Repeated ids are loaded once.
    pub fn new<S: AsRef<str>>(
        library_ids: &[S],
        source: &dyn LibrarySource,
        store: Arc<dyn QuestionStore>,
        options: SchedulerOptions,
    ) -> Result<Self> {
        let mut libraries = Vec::with_capacity(library_ids.len());
        let mut requested = HashSet::with_capacity(library_ids.len());

        for id in library_ids {
            let id = id.as_ref();
            if !requested.insert(id) {
                tracing::warn!(library = id, "library requested twice, ignoring repeat");
                continue;
            }
            match source.load(id) {
                Ok(library) => libraries.push(library),
                Err(e) => {
                    if e
                        .downcast_ref::<LibraryError>()
                        .is_some_and(LibraryError::is_fatal)
                    {
                        return Err(e);
                    }
                    tracing::error!(library = id, "failed to load library, skipping: {e:#}");
                }
            }
        }

        Ok(Self::from_libraries(&libraries, store, options))
    }

    /// Build a scheduler from libraries that are already in memory.
    pub fn from_libraries(
        libraries: &[Library],
        store: Arc<dyn QuestionStore>,
        options: SchedulerOptions,
    ) -> Self {
        let units: Vec<Question> = libraries.iter().flat_map(decompose::units).collect();
        let unit_count = units.len();

        let pool = if options.randomized {
            let mut rng = match options.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Pool::partitioned(units, &mut rng)
        } else {
            Pool::sequential(units)
        };

        let libraries_used: Vec<String> = libraries.iter().map(|l| l.name.clone()).collect();

        tracing::info!(
            libraries = libraries_used.len(),
            units = unit_count,
            randomized = options.randomized,
            bands = ?pool.band_sizes(),
            "question pool ready"
        );

        Self {
            pool,
            walker: BiasWalker::new(),
            randomized: options.randomized,
            libraries_used,
            served: 0,
            store,
        }
    }

    /// Whether any question remains to be asked.
    pub fn has_more_questions(&self) -> bool {
        self.current_question_count() > 0
    }

    /// Take the next question, or `None` once the pool is exhausted.
    pub fn next_question(&mut self) -> Option<Question> {
        let band = self.walker.advance();
        let question = self.pool.extract_from(band)?;
        self.served += 1;
        Some(question)
    }

    /// Number of questions not yet asked.
    pub fn current_question_count(&self) -> usize {
        self.pool.len()
    }

    /// Comma-separated names of the libraries that contributed questions.
    pub fn libraries_used_description(&self) -> String {
        self.libraries_used.join(", ")
    }

    /// Names of the libraries that loaded successfully, in request order.
    pub fn libraries_used(&self) -> &[String] {
        &self.libraries_used
    }

    /// Hand a scored question to the persistence collaborator.
    pub fn persist(&self, question: &Question) -> Result<()> {
        self.store
            .save(question)
            .with_context(|| format!("failed to persist question {}", question.key()))
    }

    pub fn state(&self) -> SessionState {
        if self.pool.is_empty() {
            SessionState::Exhausted
        } else if self.served == 0 {
            SessionState::Idle
        } else {
            SessionState::Serving
        }
    }

    pub fn is_randomized(&self) -> bool {
        self.randomized
    }

    /// Number of questions served so far.
    pub fn served(&self) -> usize {
        self.served
    }

    /// The band the next call to [`Scheduler::next_question`] will request.
    pub fn next_target_band(&self) -> Band {
        self.walker.peek()
    }

    /// Remaining units per band, weakest first.
    pub fn band_sizes(&self) -> [usize; BAND_COUNT] {
        self.pool.band_sizes()
    }
}
