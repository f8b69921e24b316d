use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::types::Edge;

/// Every gene identifier seen in the corpus, as source or target.
///
/// Notes:
/// - iteration is byte-wise lexicographic (case-sensitive); this is the column
///   order of the degree matrix.
/// - empty identifiers are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    genes: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gene; returns `true` if it was not known yet.
    pub fn insert(&mut self, gene: &str) -> bool {
        if gene.is_empty() || self.genes.contains(gene) {
            return false;
        }
        self.genes.insert(gene.to_string())
    }

    /// Add both endpoints of an edge.
    pub fn add_edge(&mut self, edge: &Edge) {
        for gene in edge.genes() {
            self.insert(gene);
        }
    }

    pub fn merge(&mut self, other: Vocabulary) {
        self.genes.extend(other.genes);
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Genes in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.genes.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut v = Vocabulary::new();
        for g in iter {
            v.insert(g.as_ref());
        }
        v
    }
}
