//! Core data model types for quizbank.
//!
//! Libraries hold authored questions (`LibraryQuestion`). The scheduler never
//! hands those out directly: it works on schedulable units (`Question`), which
//! are either simple questions or single rows projected out of a composite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::correctness;
use crate::error::LibraryError;

/// Placeholder in a composite prompt template that is replaced by the row cue.
pub const TEMPLATE_PLACEHOLDER: &str = "[q]";

/// A free-standing question with a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleQuestion {
    /// Identifier, unique within its library.
    pub id: String,
    /// Library this question belongs to (lookup only).
    pub library_id: String,
    pub prompt: String,
    pub answer: String,
    /// Text shown after the answer has been given.
    #[serde(default)]
    pub post_answer: Option<String>,
    #[serde(default)]
    pub marks_awarded: u32,
    #[serde(default)]
    pub marks_available: u32,
    #[serde(default)]
    pub times_asked: u32,
}

impl SimpleQuestion {
    pub fn new(
        library_id: impl Into<String>,
        id: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            library_id: library_id.into(),
            prompt: prompt.into(),
            answer: answer.into(),
            post_answer: None,
            marks_awarded: 0,
            marks_available: 0,
            times_asked: 0,
        }
    }

    /// Set the historical counters (builder style, mostly for tests and parsing).
    pub fn with_history(mut self, awarded: u32, available: u32, times_asked: u32) -> Self {
        self.marks_awarded = awarded;
        self.marks_available = available;
        self.times_asked = times_asked;
        self
    }
}

/// One row of a composite question as stored in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRow {
    /// Column-1 text, substituted into the prompt template.
    pub cue: String,
    /// Column-2 text, the expected answer.
    pub answer: String,
    #[serde(default)]
    pub marks_awarded: u32,
    #[serde(default)]
    pub marks_available: u32,
    #[serde(default)]
    pub times_asked: u32,
}

/// A table-style question: one prompt template applied to many aligned rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeQuestion {
    pub id: String,
    pub library_id: String,
    /// Prompt template; `[q]` is replaced by the row cue.
    pub template: String,
    /// Marks a single correct row answer is worth.
    pub marks_per_correct_answer: u32,
    pub rows: Vec<CompositeRow>,
}

impl CompositeQuestion {
    /// Build a composite from two aligned columns.
    ///
    /// Per-row counters start at zero. The columns must have equal length.
    pub fn from_columns(
        library_id: impl Into<String>,
        id: impl Into<String>,
        template: impl Into<String>,
        column1: Vec<String>,
        column2: Vec<String>,
    ) -> Result<Self, LibraryError> {
        let id = id.into();
        if column1.len() != column2.len() {
            return Err(LibraryError::ColumnMismatch {
                question_id: id,
                column1: column1.len(),
                column2: column2.len(),
            });
        }

        let rows = column1
            .into_iter()
            .zip(column2)
            .map(|(cue, answer)| CompositeRow {
                cue,
                answer,
                marks_awarded: 0,
                marks_available: 0,
                times_asked: 0,
            })
            .collect();

        Ok(Self {
            id,
            library_id: library_id.into(),
            template: template.into(),
            marks_per_correct_answer: 1,
            rows,
        })
    }

    /// Render the prompt for a given cue.
    pub fn render_prompt(&self, cue: &str) -> String {
        render_template(&self.template, cue)
    }
}

pub(crate) fn render_template(template: &str, cue: &str) -> String {
    if template.contains(TEMPLATE_PLACEHOLDER) {
        template.replace(TEMPLATE_PLACEHOLDER, cue)
    } else if template.trim().is_empty() {
        cue.to_string()
    } else {
        format!("{template} {cue}")
    }
}

/// Identifies the composite a unit was projected from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub library_id: String,
    pub question_id: String,
}

/// A single row of a composite question, scheduled independently of its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeUnit {
    /// Back-reference used only when persisting the row's counters.
    pub parent: ParentRef,
    pub row_index: usize,
    /// Prompt with the template already applied.
    pub prompt: String,
    pub answer: String,
    pub marks_per_correct_answer: u32,
    pub marks_awarded: u32,
    pub marks_available: u32,
    pub times_asked: u32,
}

/// An entry of a library as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibraryQuestion {
    Simple(SimpleQuestion),
    Composite(CompositeQuestion),
}

impl LibraryQuestion {
    pub fn id(&self) -> &str {
        match self {
            LibraryQuestion::Simple(q) => &q.id,
            LibraryQuestion::Composite(q) => &q.id,
        }
    }
}

/// A schedulable unit: the only thing the pool ever holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Question {
    Simple(SimpleQuestion),
    CompositeUnit(CompositeUnit),
}

impl Question {
    /// Stable key, unique across all loaded libraries.
    ///
    /// Composite rows are keyed as `library/question#row`.
    pub fn key(&self) -> String {
        match self {
            Question::Simple(q) => format!("{}/{}", q.library_id, q.id),
            Question::CompositeUnit(u) => format!(
                "{}/{}#{}",
                u.parent.library_id, u.parent.question_id, u.row_index
            ),
        }
    }

    pub fn library_id(&self) -> &str {
        match self {
            Question::Simple(q) => &q.library_id,
            Question::CompositeUnit(u) => &u.parent.library_id,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Question::Simple(q) => &q.prompt,
            Question::CompositeUnit(u) => &u.prompt,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            Question::Simple(q) => &q.answer,
            Question::CompositeUnit(u) => &u.answer,
        }
    }

    pub fn post_answer(&self) -> Option<&str> {
        match self {
            Question::Simple(q) => q.post_answer.as_deref(),
            Question::CompositeUnit(_) => None,
        }
    }

    pub fn marks_awarded(&self) -> u32 {
        match self {
            Question::Simple(q) => q.marks_awarded,
            Question::CompositeUnit(u) => u.marks_awarded,
        }
    }

    pub fn marks_available(&self) -> u32 {
        match self {
            Question::Simple(q) => q.marks_available,
            Question::CompositeUnit(u) => u.marks_available,
        }
    }

    pub fn times_asked(&self) -> u32 {
        match self {
            Question::Simple(q) => q.times_asked,
            Question::CompositeUnit(u) => u.times_asked,
        }
    }

    /// Marks a fully correct answer is worth.
    pub fn marks_per_correct_answer(&self) -> u32 {
        match self {
            Question::Simple(_) => 1,
            Question::CompositeUnit(u) => u.marks_per_correct_answer,
        }
    }

    /// Historical correctness ratio in [0, 1].
    pub fn correctness(&self) -> f64 {
        correctness(
            self.marks_awarded(),
            self.marks_available(),
            self.times_asked(),
        )
    }

    /// Record one answer: bumps times asked and accumulates the marks.
    ///
    /// `awarded` is clamped to `available`.
    pub fn record_answer(&mut self, awarded: u32, available: u32) {
        let awarded = awarded.min(available);
        let (marks_awarded, marks_available, times_asked) = match self {
            Question::Simple(q) => (
                &mut q.marks_awarded,
                &mut q.marks_available,
                &mut q.times_asked,
            ),
            Question::CompositeUnit(u) => (
                &mut u.marks_awarded,
                &mut u.marks_available,
                &mut u.times_asked,
            ),
        };
        *marks_awarded = marks_awarded.saturating_add(awarded);
        *marks_available = marks_available.saturating_add(available);
        *times_asked = times_asked.saturating_add(1);
    }
}

/// An ordered, named collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<LibraryQuestion>,
}

impl Library {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            created_at: None,
            questions: Vec::new(),
        }
    }

    /// Append a question, re-homing it to this library.
    pub fn push(&mut self, question: LibraryQuestion) {
        let question = match question {
            LibraryQuestion::Simple(mut q) => {
                q.library_id = self.id.clone();
                LibraryQuestion::Simple(q)
            }
            LibraryQuestion::Composite(mut q) => {
                q.library_id = self.id.clone();
                LibraryQuestion::Composite(q)
            }
        };
        self.questions.push(question);
    }

    pub fn question(&self, id: &str) -> Option<&LibraryQuestion> {
        self.questions.iter().find(|q| q.id() == id)
    }
}
