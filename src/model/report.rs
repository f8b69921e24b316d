use std::fmt;

use crate::types::AgeGroup;

/// A recoverable problem met while reading the corpus.
///
/// None of these stop a run; they are collected into a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The folder for an age group does not exist or cannot be listed.
    MissingAgeFolder { age: AgeGroup, path: String, reason: String },

    /// A whole unit (one tissue file) could not be read; it was skipped.
    UnreadableUnit {
        age: AgeGroup,
        tissue: String,
        origin: String,
        reason: String,
    },

    /// A single record lacked a source or target gene; only that record was skipped.
    MalformedEdge {
        age: AgeGroup,
        tissue: String,
        origin: String,
        line: u64,
        problem: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingAgeFolder { age, path, reason } => {
                write!(f, "age group {age}: folder '{path}' skipped ({reason})")
            }
            Diagnostic::UnreadableUnit { age, tissue, origin, reason } => {
                write!(f, "age group {age}, tissue {tissue}: unit '{origin}' skipped ({reason})")
            }
            Diagnostic::MalformedEdge { age, tissue, origin, line, problem } => write!(
                f,
                "age group {age}, tissue {tissue}: '{origin}' line {line} skipped ({problem})"
            ),
        }
    }
}

/// Side-channel returned next to the computed tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub units_read: usize,
    pub edges_read: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn missing_folders(&self) -> usize {
        self.count(|d| matches!(d, Diagnostic::MissingAgeFolder { .. }))
    }

    pub fn unreadable_units(&self) -> usize {
        self.count(|d| matches!(d, Diagnostic::UnreadableUnit { .. }))
    }

    pub fn malformed_edges(&self) -> usize {
        self.count(|d| matches!(d, Diagnostic::MalformedEdge { .. }))
    }

    fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.diagnostics.iter().filter(|d| pred(d)).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units, {} edges read; skipped: {} folders, {} units, {} records",
            self.units_read,
            self.edges_read,
            self.missing_folders(),
            self.unreadable_units(),
            self.malformed_edges()
        )
    }
}
