//! The `quizbank stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizbank_core::stats::LibraryStats;
use quizbank_core::traits::LibrarySource;
use quizbank_core::{Band, LibraryError};

pub fn execute(libraries: Vec<String>, config: Option<PathBuf>) -> Result<()> {
    let config = super::config(config.as_deref())?;
    let store = config.library_store();
    let ids = super::library_ids(&store, &libraries)?;

    let mut stats = Vec::with_capacity(ids.len());
    for id in &ids {
        match store.load(id) {
            Ok(library) => stats.push(LibraryStats::compute(&library)),
            Err(e) => {
                if e
                    .downcast_ref::<LibraryError>()
                    .is_some_and(LibraryError::is_fatal)
                {
                    return Err(e);
                }
                tracing::error!(library = %id, "failed to load library, skipping: {e:#}");
            }
        }
    }

    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &[LibraryStats]) {
    let mut table = Table::new();
    let mut header = vec![
        "Library".to_string(),
        "Units".to_string(),
        "Never asked".to_string(),
        "Avg correct".to_string(),
    ];
    header.extend(Band::all().map(|b| b.range_label().to_string()));
    table.set_header(header);

    for s in stats {
        let mut row = vec![
            Cell::new(&s.name),
            Cell::new(s.units),
            Cell::new(s.never_asked),
            Cell::new(
                s.average_correctness
                    .map(|c| format!("{:.1}%", c * 100.0))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ];
        row.extend(s.bands.iter().map(Cell::new));
        table.add_row(row);
    }

    println!("{table}");
}
