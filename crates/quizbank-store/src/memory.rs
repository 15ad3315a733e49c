//! In-memory library store for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;

use quizbank_core::error::LibraryError;
use quizbank_core::model::{Library, LibraryQuestion, Question};
use quizbank_core::traits::{LibrarySource, QuestionStore};

use crate::error::StoreError;

/// A store that keeps libraries in memory.
///
/// Saved counters are applied to the held libraries, so a later `load` sees
/// them, and every saved question is also recorded for inspection.
#[derive(Default)]
pub struct MemoryStore {
    libraries: Mutex<HashMap<String, Library>>,
    /// Ids whose `load` fails as if the backing file were corrupt.
    failing: HashSet<String>,
    saved: Mutex<Vec<Question>>,
}

impl MemoryStore {
    pub fn new(libraries: impl IntoIterator<Item = Library>) -> Self {
        Self {
            libraries: Mutex::new(libraries.into_iter().map(|l| (l.id.clone(), l)).collect()),
            failing: HashSet::new(),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Make `load(id)` fail with a non-fatal error.
    pub fn with_failing(mut self, id: impl Into<String>) -> Self {
        self.failing.insert(id.into());
        self
    }

    /// Every question passed to `save`, in order.
    pub fn saved(&self) -> Vec<Question> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LibrarySource for MemoryStore {
    fn load(&self, id: &str) -> Result<Library> {
        if self.failing.contains(id) {
            anyhow::bail!("library '{id}' is unreadable");
        }
        let libraries = self.libraries.lock().unwrap_or_else(|e| e.into_inner());
        libraries
            .get(id)
            .cloned()
            .ok_or_else(|| LibraryError::UnknownLibrary(id.to_string()).into())
    }

    fn list(&self) -> Result<Vec<String>> {
        let libraries = self.libraries.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = libraries.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl QuestionStore for MemoryStore {
    fn save(&self, question: &Question) -> Result<()> {
        {
            let mut libraries = self.libraries.lock().unwrap_or_else(|e| e.into_inner());
            let library = libraries
                .get_mut(question.library_id())
                .ok_or_else(|| LibraryError::UnknownLibrary(question.library_id().to_string()))?;
            apply_counters(library, question)?;
        }
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(question.clone());
        Ok(())
    }
}

/// Copy a unit's counters into the matching question of `library`.
fn apply_counters(library: &mut Library, question: &Question) -> Result<(), StoreError> {
    let library_id = library.id.clone();
    let not_found = |question_id: &str| StoreError::QuestionNotFound {
        library_id: library_id.clone(),
        question_id: question_id.to_string(),
    };

    match question {
        Question::Simple(unit) => {
            let Some(stored) = library.questions.iter_mut().find(|q| q.id() == unit.id) else {
                return Err(not_found(&unit.id));
            };
            let LibraryQuestion::Simple(stored) = stored else {
                return Err(StoreError::KindMismatch {
                    question_id: unit.id.clone(),
                    expected: "simple",
                });
            };
            stored.marks_awarded = unit.marks_awarded;
            stored.marks_available = unit.marks_available;
            stored.times_asked = unit.times_asked;
        }
        Question::CompositeUnit(unit) => {
            let question_id = &unit.parent.question_id;
            let Some(stored) = library
                .questions
                .iter_mut()
                .find(|q| q.id() == question_id.as_str())
            else {
                return Err(not_found(question_id));
            };
            let LibraryQuestion::Composite(stored) = stored else {
                return Err(StoreError::KindMismatch {
                    question_id: question_id.clone(),
                    expected: "composite",
                });
            };
            let rows = stored.rows.len();
            let row = stored
                .rows
                .get_mut(unit.row_index)
                .ok_or_else(|| StoreError::RowOutOfRange {
                    question_id: question_id.clone(),
                    row: unit.row_index,
                    rows,
                })?;
            row.marks_awarded = unit.marks_awarded;
            row.marks_available = unit.marks_available;
            row.times_asked = unit.times_asked;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use quizbank_core::model::{CompositeQuestion, SimpleQuestion};

    fn library() -> Library {
        let mut lib = Library::new("maths", "Maths");
        lib.push(LibraryQuestion::Simple(SimpleQuestion::new("", "add", "2 + 2?", "4")));
        lib.push(LibraryQuestion::Composite(
            CompositeQuestion::from_columns(
                "",
                "squares",
                "Square of [q]?",
                vec!["3".into(), "4".into()],
                vec!["9".into(), "16".into()],
            )
            .unwrap(),
        ));
        lib
    }

    #[test]
    fn save_into_unknown_library_fails() {
        let store = MemoryStore::new([library()]);
        let q = Question::Simple(SimpleQuestion::new("nowhere", "x", "p", "a"));
        assert!(store.save(&q).is_err());
        assert!(store.saved().is_empty());
    }

    #[test]
    fn save_updates_held_library() {
        let store = MemoryStore::new([library()]);
        let mut unit = quizbank_core::decompose::units(&store.load("maths").unwrap()).remove(2);
        unit.record_answer(1, 1);
        store.save(&unit).unwrap();

        let reloaded = store.load("maths").unwrap();
        let LibraryQuestion::Composite(c) = &reloaded.questions[1] else {
            panic!("expected composite question");
        };
        assert_eq!(c.rows[1].times_asked, 1);
        assert_eq!(c.rows[0].times_asked, 0);
        assert_eq!(store.saved(), vec![unit]);
    }

    #[test]
    fn failing_library_load_is_not_unknown() {
        let store = MemoryStore::new([library()]).with_failing("physics");
        let err = store.load("physics").unwrap_err();
        assert!(err.downcast_ref::<LibraryError>().is_none());
    }

    #[test]
    fn list_is_sorted() {
        let store = MemoryStore::new([Library::new("b", "B"), Library::new("a", "A")]);
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
    }
}
