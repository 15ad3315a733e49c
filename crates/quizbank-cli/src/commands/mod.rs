pub mod history;
pub mod init;
pub mod plan;
pub mod quiz;
pub mod stats;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use quizbank_core::traits::{LibrarySource, NoopStore, QuestionStore};
use quizbank_core::Scheduler;
use quizbank_store::{load_config_from, FsLibraryStore, QuizbankConfig};

use crate::SessionArgs;

/// Resolve which library ids to use: the requested ones, or every library
/// in the store.
pub fn library_ids(store: &FsLibraryStore, requested: &[String]) -> Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    let ids = store.list()?;
    anyhow::ensure!(
        !ids.is_empty(),
        "no libraries found in {}. Run `quizbank init` to create one.",
        store.dir().display()
    );
    Ok(ids)
}

/// Load config and build a scheduler for the session arguments.
///
/// With `persist`, answers are written back to the library files; otherwise
/// they are discarded.
pub fn open_session(args: &SessionArgs, persist: bool) -> Result<(QuizbankConfig, Scheduler)> {
    let config = load_config_from(args.config.as_deref())?;
    let store = Arc::new(config.library_store());
    let ids = library_ids(&store, &args.libraries)?;
    let sink: Arc<dyn QuestionStore> = if persist { store.clone() } else { Arc::new(NoopStore) };

    let mut options = config.scheduler_options();
    if args.sequential {
        options.randomized = false;
    }
    if args.seed.is_some() {
        options.seed = args.seed;
    }

    let scheduler = Scheduler::new(&ids, store.as_ref(), sink, options)?;
    Ok((config, scheduler))
}

/// Load config only, for commands that do not build a pool.
pub fn config(path: Option<&Path>) -> Result<QuizbankConfig> {
    load_config_from(path)
}
