//! The `quizbank validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizbank_core::decompose;
use quizbank_core::parser::{library_files, parse_library, validate_library};

pub fn execute(path: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => super::config(config.as_deref())?.library_dir,
    };

    let files = if path.is_dir() {
        library_files(&path)?
    } else {
        vec![path]
    };

    let mut total_warnings = 0;
    let mut failed = 0;

    for file in &files {
        let library = match parse_library(file) {
            Ok(library) => library,
            Err(e) => {
                println!("{}: ERROR: {e:#}", file.display());
                failed += 1;
                continue;
            }
        };

        println!(
            "Library: {} ({} questions, {} units)",
            library.name,
            library.questions.len(),
            decompose::units(&library).len()
        );

        let warnings = validate_library(&library);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if failed > 0 {
        anyhow::bail!("{failed} library file(s) failed to parse");
    }

    if total_warnings == 0 {
        println!("All libraries valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
