//! The `quizbank history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizbank_core::history::QuizHistory;

pub fn execute(limit: usize, config: Option<PathBuf>) -> Result<()> {
    let config = super::config(config.as_deref())?;
    let history = QuizHistory::load(&config.history_file)?;

    if history.entries.is_empty() {
        println!("No quiz sessions recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Date", "Score", "Percent", "Answered", "Skipped", "Libraries",
    ]);

    for entry in history.latest(limit) {
        table.add_row(vec![
            Cell::new(entry.date.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.score),
            Cell::new(format!("{}%", entry.percentage)),
            Cell::new(entry.questions_answered),
            Cell::new(entry.questions_skipped),
            Cell::new(&entry.libraries),
        ]);
    }

    println!("{table}");
    println!("{} session(s) total.", history.entries.len());
    Ok(())
}
