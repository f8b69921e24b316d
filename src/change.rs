use serde::{Serialize, Deserialize};

use crate::aggregate::DegreeTable;
use crate::model::Vocabulary;
use crate::trend;
use crate::types::{AgeGroups, Change};

/// Transitions of one gene in one tissue, in lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub tissue: String,
    pub gene: String,
    pub changes: Vec<Change>,
}

impl ChangeRow {
    /// Trend score against a lifecycle of `transitions` steps.
    pub fn trend_score(&self, transitions: usize) -> f64 {
        trend::score(&self.changes, transitions)
    }
}

/// One row per (tissue, gene); one column per consecutive age-group transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeMatrix {
    pub age_groups: AgeGroups,
    pub rows: Vec<ChangeRow>,
}

impl ChangeMatrix {
    /// Build every (tissue, gene) row.
    ///
    /// Tissues are every tissue observed at any age group (sorted by name); genes
    /// follow vocabulary order. Degrees at unobserved age groups read as 0.
    pub fn build(table: &DegreeTable, vocabulary: &Vocabulary, age_groups: &AgeGroups) -> Self {
        let ages = age_groups.as_slice();
        let tissues = table.tissues();

        let mut rows = Vec::with_capacity(tissues.len() * vocabulary.len());
        for tissue in tissues {
            for gene in vocabulary.iter() {
                let trajectory: Vec<u64> = ages
                    .iter()
                    .map(|&age| table.degree(age, tissue, gene))
                    .collect();

                rows.push(ChangeRow {
                    tissue: tissue.to_string(),
                    gene: gene.to_string(),
                    changes: transitions(&trajectory),
                });
            }
        }

        Self {
            age_groups: age_groups.clone(),
            rows,
        }
    }

    /// `Tissue, Gene, Change_<a>_to_<b>...`
    pub fn header(&self) -> Vec<String> {
        let mut h = vec!["Tissue".to_string(), "Gene".to_string()];
        h.extend(self.age_groups.transition_labels());
        h
    }

    /// Full-lifecycle transition count, the trend score divisor.
    pub fn transition_count(&self) -> usize {
        self.age_groups.transition_count()
    }

    pub fn row(&self, tissue: &str, gene: &str) -> Option<&ChangeRow> {
        self.rows.iter().find(|r| r.tissue == tissue && r.gene == gene)
    }

    /// Tissues in row order, deduplicated.
    pub fn tissues(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.rows {
            if !out.contains(&r.tissue.as_str()) {
                out.push(&r.tissue);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sign of every consecutive difference of a degree trajectory.
///
/// All transitions, the last one included, go through the same rule.
pub fn transitions(trajectory: &[u64]) -> Vec<Change> {
    trajectory
        .windows(2)
        .map(|w| Change::between(w[0], w[1]))
        .collect()
}
