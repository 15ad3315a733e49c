//! Filesystem-backed libraries.
//!
//! Each library is a TOML file `<library_dir>/<id>.toml`. Counters are written
//! back with `toml_edit`, so comments and layout in the file are preserved.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml_edit::{Array, DocumentMut, Item, Table};

use quizbank_core::error::LibraryError;
use quizbank_core::model::{Library, Question};
use quizbank_core::parser;
use quizbank_core::traits::{LibrarySource, QuestionStore};

use crate::error::StoreError;

/// Loads and persists libraries stored as TOML files in one directory.
#[derive(Debug, Clone)]
pub struct FsLibraryStore {
    dir: PathBuf,
}

impl FsLibraryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing library `id`, or `None` if `id` is not a
    /// plain file name.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.is_empty()
            && !id.contains(['/', '\\'])
            && id != "."
            && id != "..";
        plain.then(|| self.dir.join(format!("{id}.toml")))
    }

    fn existing_path(&self, id: &str) -> Result<PathBuf> {
        match self.path_for(id) {
            Some(path) if path.is_file() => Ok(path),
            _ => Err(LibraryError::UnknownLibrary(id.to_string()).into()),
        }
    }
}

impl LibrarySource for FsLibraryStore {
    fn load(&self, id: &str) -> Result<Library> {
        let path = self.existing_path(id)?;
        tracing::debug!(library = id, path = %path.display(), "loading library");
        parser::parse_library(&path)
    }

    fn list(&self) -> Result<Vec<String>> {
        parser::library_files(&self.dir)
            .context("failed to list libraries")?
            .iter()
            .map(|path| parser::library_id_from_path(path))
            .collect()
    }
}

impl QuestionStore for FsLibraryStore {
    fn save(&self, question: &Question) -> Result<()> {
        let library_id = question.library_id();
        let path = self.existing_path(library_id)?;

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read library file: {}", path.display()))?;
        let mut doc: DocumentMut = content
            .parse()
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;

        write_counters(&mut doc, library_id, question)?;

        std::fs::write(&path, doc.to_string())
            .with_context(|| format!("failed to write library file: {}", path.display()))?;
        tracing::debug!(question = %question.key(), "saved question counters");
        Ok(())
    }
}

/// Update the counters of `question` inside a parsed library document.
pub fn write_counters(
    doc: &mut DocumentMut,
    library_id: &str,
    question: &Question,
) -> Result<(), StoreError> {
    let question_id = match question {
        Question::Simple(q) => q.id.as_str(),
        Question::CompositeUnit(u) => u.parent.question_id.as_str(),
    };

    let tables = doc
        .get_mut("questions")
        .and_then(Item::as_array_of_tables_mut)
        .ok_or_else(|| StoreError::MissingQuestions(library_id.to_string()))?;

    let table = tables
        .iter_mut()
        .find(|t| t.get("id").and_then(Item::as_str) == Some(question_id))
        .ok_or_else(|| StoreError::QuestionNotFound {
            library_id: library_id.to_string(),
            question_id: question_id.to_string(),
        })?;

    let kind = table.get("type").and_then(Item::as_str).unwrap_or_default();

    match question {
        Question::Simple(q) => {
            if kind != "simple" {
                return Err(StoreError::KindMismatch {
                    question_id: question_id.to_string(),
                    expected: "simple",
                });
            }
            table["marks_awarded"] = toml_edit::value(i64::from(q.marks_awarded));
            table["marks_available"] = toml_edit::value(i64::from(q.marks_available));
            table["times_asked"] = toml_edit::value(i64::from(q.times_asked));
        }
        Question::CompositeUnit(u) => {
            if kind != "composite" {
                return Err(StoreError::KindMismatch {
                    question_id: question_id.to_string(),
                    expected: "composite",
                });
            }
            let rows = table
                .get("column1")
                .and_then(Item::as_array)
                .map(Array::len)
                .unwrap_or(0);
            if u.row_index >= rows {
                return Err(StoreError::RowOutOfRange {
                    question_id: question_id.to_string(),
                    row: u.row_index,
                    rows,
                });
            }
            set_row(table, "marks_awarded", rows, u.row_index, u.marks_awarded);
            set_row(table, "marks_available", rows, u.row_index, u.marks_available);
            set_row(table, "times_asked", rows, u.row_index, u.times_asked);
        }
    }

    Ok(())
}

/// Overwrite one element of a per-row stats array, fitting it to `rows` first.
fn set_row(table: &mut Table, key: &str, rows: usize, index: usize, value: u32) {
    let mut values: Vec<i64> = table
        .get(key)
        .and_then(Item::as_array)
        .map(|a| a.iter().map(|v| v.as_integer().unwrap_or(0)).collect())
        .unwrap_or_default();
    values.resize(rows, 0);
    values[index] = i64::from(value);
    table[key] = toml_edit::value(values.into_iter().collect::<Array>());
}

#[cfg(test)]
mod tests {
    use super::*;

    use quizbank_core::decompose;
    use quizbank_core::model::LibraryQuestion;

    const LIBRARY: &str = r#"# French vocabulary, kept by hand
[library]
name = "French"

[[questions]]
type = "simple"
id = "bonjour"
prompt = "Translate: bonjour"
answer = "hello"

[[questions]]
# colours table
type = "composite"
id = "colours"
template = "Translate [q]"
column1 = ["rouge", "bleu", "vert"]
column2 = ["red", "blue", "green"]
times_asked = [4]
"#;

    fn store_with_library() -> (tempfile::TempDir, FsLibraryStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("french.toml"), LIBRARY).unwrap();
        std::fs::write(dir.path().join("README.md"), "not a library").unwrap();
        let store = FsLibraryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn lists_and_loads_libraries() {
        let (_dir, store) = store_with_library();
        assert_eq!(store.list().unwrap(), vec!["french"]);
        let lib = store.load("french").unwrap();
        assert_eq!(lib.name, "French");
        assert_eq!(decompose::units(&lib).len(), 4);
    }

    #[test]
    fn unknown_library_is_typed() {
        let (_dir, store) = store_with_library();
        for id in ["german", "../french", ""] {
            let err = store.load(id).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<LibraryError>(),
                Some(LibraryError::UnknownLibrary(_))
            ));
        }
    }

    #[test]
    fn corrupt_library_is_not_unknown() {
        let (dir, store) = store_with_library();
        std::fs::write(dir.path().join("broken.toml"), "[library\nname=").unwrap();
        let err = store.load("broken").unwrap_err();
        assert!(err.downcast_ref::<LibraryError>().is_none());
    }

    #[test]
    fn saves_simple_counters_and_keeps_comments() {
        let (dir, store) = store_with_library();
        let lib = store.load("french").unwrap();
        let mut unit = decompose::units(&lib).remove(0);
        unit.record_answer(1, 1);
        store.save(&unit).unwrap();

        let text = std::fs::read_to_string(dir.path().join("french.toml")).unwrap();
        assert!(text.starts_with("# French vocabulary, kept by hand"));
        assert!(text.contains("# colours table"));

        let reloaded = store.load("french").unwrap();
        let LibraryQuestion::Simple(q) = &reloaded.questions[0] else {
            panic!("expected simple question");
        };
        assert_eq!((q.marks_awarded, q.marks_available, q.times_asked), (1, 1, 1));
    }

    #[test]
    fn saves_composite_row_only() {
        let (_dir, store) = store_with_library();
        let lib = store.load("french").unwrap();
        let mut unit = decompose::units(&lib).remove(3); // colours row 2
        unit.record_answer(0, 1);
        store.save(&unit).unwrap();

        let reloaded = store.load("french").unwrap();
        let LibraryQuestion::Composite(c) = &reloaded.questions[1] else {
            panic!("expected composite question");
        };
        let asked: Vec<u32> = c.rows.iter().map(|r| r.times_asked).collect();
        let available: Vec<u32> = c.rows.iter().map(|r| r.marks_available).collect();
        assert_eq!(asked, vec![4, 0, 1]);
        assert_eq!(available, vec![0, 0, 1]);
    }

    #[test]
    fn save_reports_missing_question() {
        let (_dir, store) = store_with_library();
        let lib = store.load("french").unwrap();
        let mut unit = decompose::units(&lib).remove(0);
        if let Question::Simple(q) = &mut unit {
            q.id = "au-revoir".into();
        }
        let err = store.save(&unit).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::QuestionNotFound { .. })
        ));
    }

    #[test]
    fn row_out_of_range_is_rejected() {
        let mut doc: DocumentMut = LIBRARY.parse().unwrap();
        let lib = parser::parse_library_str(LIBRARY, "french", Path::new("french.toml")).unwrap();
        let mut unit = decompose::units(&lib).remove(1);
        if let Question::CompositeUnit(u) = &mut unit {
            u.row_index = 7;
        }
        let err = write_counters(&mut doc, "french", &unit).unwrap_err();
        assert!(matches!(err, StoreError::RowOutOfRange { row: 7, rows: 3, .. }));
    }
}
