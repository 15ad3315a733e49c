//! Quiz history: one entry per finished session, kept as a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finished quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizHistoryEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Marks awarded as a percentage of marks available, 0-100.
    pub percentage: u32,
    pub questions_answered: u32,
    pub questions_skipped: u32,
    /// Total marks awarded.
    pub score: u32,
    /// Libraries the session drew from.
    pub libraries: String,
}

/// Running totals for a session in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub answered: u32,
    pub skipped: u32,
    pub marks_awarded: u32,
    pub marks_available: u32,
}

impl SessionTally {
    pub fn record_answer(&mut self, awarded: u32, available: u32) {
        self.answered += 1;
        self.marks_awarded += awarded.min(available);
        self.marks_available += available;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Rounded percentage of available marks that were awarded.
    pub fn percentage(&self) -> u32 {
        if self.marks_available == 0 {
            return 0;
        }
        ((self.marks_awarded as f64 / self.marks_available as f64) * 100.0).round() as u32
    }

    /// Close the session into a history entry.
    pub fn into_entry(self, libraries: impl Into<String>) -> QuizHistoryEntry {
        QuizHistoryEntry {
            id: Uuid::new_v4(),
            date: Utc::now(),
            percentage: self.percentage(),
            questions_answered: self.answered,
            questions_skipped: self.skipped,
            score: self.marks_awarded,
            libraries: libraries.into(),
        }
    }
}

/// All recorded sessions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizHistory {
    #[serde(default)]
    pub entries: Vec<QuizHistoryEntry>,
}

impl QuizHistory {
    /// Load history from a JSON file. A missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse history JSON: {}", path.display()))
    }

    /// Save history as JSON to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize history")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        Ok(())
    }

    /// Append one entry to the history file at `path`.
    pub fn append(path: &Path, entry: QuizHistoryEntry) -> Result<()> {
        let mut history = Self::load(path)?;
        history.entries.push(entry);
        history.save(path)
    }

    /// The most recent `n` entries, newest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &QuizHistoryEntry> {
        self.entries.iter().rev().take(n)
    }
}
