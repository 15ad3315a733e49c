//! TOML library parser.
//!
//! Parses library files, lists the ones in a directory, and validates them. A
//! library's id is its file stem: `libraries/french.toml` is library `french`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::LibraryError;
use crate::model::{
    CompositeQuestion, Library, LibraryQuestion, SimpleQuestion, TEMPLATE_PLACEHOLDER,
};

/// Intermediate TOML structure for parsing library files.
#[derive(Debug, Deserialize)]
struct TomlLibraryFile {
    library: TomlLibraryHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlLibraryHeader {
    name: String,
    #[serde(default)]
    description: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    created: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TomlQuestion {
    Simple(TomlSimple),
    Composite(TomlComposite),
}

#[derive(Debug, Deserialize)]
struct TomlSimple {
    id: String,
    prompt: String,
    answer: String,
    #[serde(default)]
    post_answer: Option<String>,
    #[serde(default)]
    marks_awarded: u32,
    #[serde(default)]
    marks_available: u32,
    #[serde(default)]
    times_asked: u32,
}

#[derive(Debug, Deserialize)]
struct TomlComposite {
    id: String,
    #[serde(default = "default_template")]
    template: String,
    #[serde(default = "default_marks_per_answer")]
    marks_per_correct_answer: u32,
    column1: Vec<String>,
    column2: Vec<String>,
    #[serde(default)]
    marks_awarded: Vec<u32>,
    #[serde(default)]
    marks_available: Vec<u32>,
    #[serde(default)]
    times_asked: Vec<u32>,
}

fn default_template() -> String {
    TEMPLATE_PLACEHOLDER.to_string()
}

fn default_marks_per_answer() -> u32 {
    1
}

/// Pad with zeros or truncate so per-row stats line up with the rows.
fn fit_to_rows(mut values: Vec<u32>, rows: usize) -> Vec<u32> {
    values.resize(rows, 0);
    values
}

/// Derive a library id from its file path.
pub fn library_id_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive library id from {}", path.display()))
}

/// Parse a single TOML file into a `Library`.
pub fn parse_library(path: &Path) -> Result<Library> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read library file: {}", path.display()))?;
    let id = library_id_from_path(path)?;

    parse_library_str(&content, &id, path)
}

/// Parse a TOML string into a `Library` (useful for testing).
pub fn parse_library_str(content: &str, id: &str, source_path: &Path) -> Result<Library> {
    let parsed: TomlLibraryFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let created_at = parsed
        .library
        .created
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid created timestamp '{s}'"))
        })
        .transpose()?;

    let mut library = Library {
        id: id.to_string(),
        name: parsed.library.name,
        description: parsed.library.description,
        created_at,
        questions: Vec::with_capacity(parsed.questions.len()),
    };

    let mut seen_ids = HashSet::new();
    for question in parsed.questions {
        let question = match question {
            TomlQuestion::Simple(s) => LibraryQuestion::Simple(SimpleQuestion {
                id: s.id,
                library_id: id.to_string(),
                prompt: s.prompt,
                answer: s.answer,
                post_answer: s.post_answer,
                marks_awarded: s.marks_awarded,
                marks_available: s.marks_available,
                times_asked: s.times_asked,
            }),
            TomlQuestion::Composite(c) => {
                let mut composite =
                    CompositeQuestion::from_columns(id, c.id, c.template, c.column1, c.column2)
                        .with_context(|| format!("in {}", source_path.display()))?;
                composite.marks_per_correct_answer = c.marks_per_correct_answer;

                let rows = composite.rows.len();
                let awarded = fit_to_rows(c.marks_awarded, rows);
                let available = fit_to_rows(c.marks_available, rows);
                let asked = fit_to_rows(c.times_asked, rows);
                for (i, row) in composite.rows.iter_mut().enumerate() {
                    row.marks_awarded = awarded[i];
                    row.marks_available = available[i];
                    row.times_asked = asked[i];
                }
                LibraryQuestion::Composite(composite)
            }
        };

        if !seen_ids.insert(question.id().to_string()) {
            return Err(LibraryError::DuplicateQuestionId {
                library_id: id.to_string(),
                question_id: question.id().to_string(),
            })
            .with_context(|| format!("in {}", source_path.display()));
        }
        library.questions.push(question);
    }

    Ok(library)
}

/// Paths of the `.toml` library files directly inside a directory, sorted.
pub fn library_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// A warning from library validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a library for common authoring issues.
pub fn validate_library(library: &Library) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if library.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "library has no questions".into(),
        });
    }

    for question in &library.questions {
        match question {
            LibraryQuestion::Simple(q) => {
                if q.prompt.trim().is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "prompt is empty"));
                }
                if q.answer.trim().is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "answer is empty"));
                }
                if q.marks_awarded > q.marks_available {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        format!(
                            "marks_awarded ({}) exceeds marks_available ({})",
                            q.marks_awarded, q.marks_available
                        ),
                    ));
                }
            }
            LibraryQuestion::Composite(c) => {
                if c.rows.is_empty() {
                    warnings.push(ValidationWarning::question(&c.id, "composite has no rows"));
                }
                if !c.template.contains(TEMPLATE_PLACEHOLDER) {
                    warnings.push(ValidationWarning::question(
                        &c.id,
                        format!("template has no {TEMPLATE_PLACEHOLDER} placeholder; cue is appended"),
                    ));
                }
                for (i, row) in c.rows.iter().enumerate() {
                    if row.cue.trim().is_empty() || row.answer.trim().is_empty() {
                        warnings.push(ValidationWarning::question(
                            &c.id,
                            format!("row {i} has an empty cell"),
                        ));
                    }
                    if row.marks_awarded > row.marks_available {
                        warnings.push(ValidationWarning::question(
                            &c.id,
                            format!("row {i}: marks_awarded exceeds marks_available"),
                        ));
                    }
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[library]
name = "Geography"
description = "Capitals and rivers"
created = "2024-03-01T09:30:00Z"

[[questions]]
type = "simple"
id = "longest-river"
prompt = "What is the longest river in Africa?"
answer = "Nile"
post_answer = "About 6650 km long."
marks_awarded = 3
marks_available = 4
times_asked = 4

[[questions]]
type = "composite"
id = "capitals"
template = "What is the capital of [q]?"
marks_per_correct_answer = 2
column1 = ["France", "Japan", "Peru"]
column2 = ["Paris", "Tokyo", "Lima"]
marks_awarded = [2, 0]
marks_available = [2, 4]
times_asked = [1, 2, 0, 9]
"#;

    fn parse(content: &str) -> Result<Library> {
        parse_library_str(content, "geo", &PathBuf::from("geo.toml"))
    }

    #[test]
    fn parse_valid_toml() {
        let lib = parse(VALID_TOML).unwrap();
        assert_eq!(lib.id, "geo");
        assert_eq!(lib.name, "Geography");
        assert_eq!(lib.questions.len(), 2);
        assert!(lib.created_at.is_some());

        match &lib.questions[0] {
            LibraryQuestion::Simple(q) => {
                assert_eq!(q.library_id, "geo");
                assert_eq!(q.times_asked, 4);
                assert_eq!(q.post_answer.as_deref(), Some("About 6650 km long."));
            }
            other => panic!("expected simple, got {other:?}"),
        }
    }

    #[test]
    fn composite_stats_are_fitted_to_rows() {
        let lib = parse(VALID_TOML).unwrap();
        let LibraryQuestion::Composite(c) = &lib.questions[1] else {
            panic!("expected composite");
        };
        assert_eq!(c.rows.len(), 3);
        assert_eq!(c.marks_per_correct_answer, 2);
        let awarded: Vec<u32> = c.rows.iter().map(|r| r.marks_awarded).collect();
        let available: Vec<u32> = c.rows.iter().map(|r| r.marks_available).collect();
        let asked: Vec<u32> = c.rows.iter().map(|r| r.times_asked).collect();
        assert_eq!(awarded, vec![2, 0, 0]);
        assert_eq!(available, vec![2, 4, 0]);
        assert_eq!(asked, vec![1, 2, 0]);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[library]
name = "Minimal"

[[questions]]
type = "simple"
id = "q1"
prompt = "2 + 2?"
answer = "4"

[[questions]]
type = "composite"
id = "words"
column1 = ["chat"]
column2 = ["cat"]
"#;
        let lib = parse(toml).unwrap();
        assert!(lib.description.is_empty());
        assert!(lib.created_at.is_none());
        let LibraryQuestion::Composite(c) = &lib.questions[1] else {
            panic!("expected composite");
        };
        assert_eq!(c.template, "[q]");
        assert_eq!(c.marks_per_correct_answer, 1);
        assert_eq!(c.rows[0].times_asked, 0);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let toml = r#"
[library]
name = "Bad"

[[questions]]
type = "composite"
id = "broken"
column1 = ["a", "b"]
column2 = ["1"]
"#;
        let err = parse(toml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LibraryError>(),
            Some(LibraryError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let toml = r#"
[library]
name = "Dupes"

[[questions]]
type = "simple"
id = "same"
prompt = "p"
answer = "a"

[[questions]]
type = "simple"
id = "same"
prompt = "p2"
answer = "a2"
"#;
        let err = parse(toml).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate question id 'same'"));
    }

    #[test]
    fn parse_malformed_toml() {
        assert!(parse("this is not [valid toml }{").is_err());
    }

    #[test]
    fn invalid_created_timestamp() {
        let toml = "[library]\nname = \"x\"\ncreated = \"yesterday\"\n";
        assert!(parse(toml).is_err());
    }

    #[test]
    fn validate_flags_authoring_issues() {
        let toml = r#"
[library]
name = "Sloppy"

[[questions]]
type = "simple"
id = "blank"
prompt = "  "
answer = "x"
marks_awarded = 5
marks_available = 2
times_asked = 1

[[questions]]
type = "composite"
id = "no-placeholder"
template = "Translate:"
column1 = ["chat", ""]
column2 = ["cat", "dog"]
"#;
        let warnings = validate_library(&parse(toml).unwrap());
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.contains(&"prompt is empty"));
        assert!(messages.iter().any(|m| m.contains("exceeds marks_available")));
        assert!(messages.iter().any(|m| m.contains("placeholder")));
        assert!(messages.contains(&"row 1 has an empty cell"));
    }

    #[test]
    fn validate_empty_library() {
        let warnings = validate_library(&parse("[library]\nname = \"Empty\"\n").unwrap());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn library_files_lists_toml_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("geo.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml {").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.toml")).unwrap();

        let files = library_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["broken.toml", "geo.toml"]);
    }

    #[test]
    fn library_files_requires_directory() {
        assert!(library_files(Path::new("definitely/not/here")).is_err());
    }
}
