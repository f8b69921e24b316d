use serde::{Serialize, Deserialize};

use crate::aggregate::DegreeTable;
use crate::model::Vocabulary;
use crate::types::AgeGroup;

/// One observed (age group, tissue) with a degree per vocabulary gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRow {
    pub age: AgeGroup,
    pub tissue: String,
    /// Aligned with `DegreeMatrix::genes`.
    pub degrees: Vec<u64>,
}

/// Dense in-degree matrix: rows are observed units, columns the sorted vocabulary.
///
/// Every row has exactly `genes.len()` cells in the same order. Rows exist only
/// for units that were observed; a tissue missing at some age group gets no row
/// there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeMatrix {
    pub genes: Vec<String>,
    pub rows: Vec<DegreeRow>,
}

impl DegreeMatrix {
    /// Zero-fill the sparse table against the full vocabulary.
    ///
    /// Rows are ordered by age group, then tissue name.
    pub fn materialize(table: &DegreeTable, vocabulary: &Vocabulary) -> Self {
        let genes = vocabulary.to_vec();

        let rows = table
            .units()
            .into_iter()
            .map(|(age, tissue)| DegreeRow {
                age,
                tissue: tissue.to_string(),
                degrees: genes
                    .iter()
                    .map(|gene| table.degree(age, tissue, gene))
                    .collect(),
            })
            .collect();

        Self { genes, rows }
    }

    /// `AgeGroup, Tissue, <gene>...`
    pub fn header(&self) -> Vec<String> {
        let mut h = Vec::with_capacity(self.genes.len() + 2);
        h.push("AgeGroup".to_string());
        h.push("Tissue".to_string());
        h.extend(self.genes.iter().cloned());
        h
    }

    pub fn row(&self, age: AgeGroup, tissue: &str) -> Option<&DegreeRow> {
        self.rows.iter().find(|r| r.age == age && r.tissue == tissue)
    }

    /// Cell lookup; `None` if the unit has no row or the gene is not a column.
    pub fn cell(&self, age: AgeGroup, tissue: &str, gene: &str) -> Option<u64> {
        let col = self.genes.binary_search_by(|g| g.as_str().cmp(gene)).ok()?;
        self.row(age, tissue).map(|r| r.degrees[col])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::EdgeUnit;
    use crate::types::Edge;

    fn unit(age: AgeGroup, tissue: &str, edges: &[(&str, &str)]) -> EdgeUnit {
        EdgeUnit {
            age,
            tissue: tissue.to_string(),
            edges: edges.iter().map(|&(s, t)| Edge::new(s, t)).collect(),
        }
    }

    fn vocab_of(units: &[EdgeUnit]) -> Vocabulary {
        let mut v = Vocabulary::new();
        for u in units {
            for e in &u.edges {
                v.add_edge(e);
            }
        }
        v
    }

    #[test]
    fn brain_scenario_rows() {
        let units = vec![
            unit(20, "brain", &[("A", "B")]),
            unit(30, "brain", &[("A", "B"), ("C", "B")]),
        ];
        let table = DegreeTable::from_units(&units);
        let m = DegreeMatrix::materialize(&table, &vocab_of(&units));

        assert_eq!(m.header(), vec!["AgeGroup", "Tissue", "A", "B", "C"]);
        assert_eq!(m.rows.len(), 2);
        assert_eq!(m.rows[0], DegreeRow { age: 20, tissue: "brain".into(), degrees: vec![0, 1, 0] });
        assert_eq!(m.rows[1], DegreeRow { age: 30, tissue: "brain".into(), degrees: vec![0, 2, 0] });
        assert_eq!(m.cell(30, "brain", "B"), Some(2));
        assert_eq!(m.cell(30, "brain", "Z"), None);
    }

    #[test]
    fn every_row_is_aligned_with_the_vocabulary() {
        let units = vec![
            unit(20, "brain", &[("x", "Y")]),
            unit(20, "liver", &[("a", "b"), ("b", "a")]),
            unit(50, "brain", &[("Q", "x")]),
        ];
        let table = DegreeTable::from_units(&units);
        let vocab = vocab_of(&units);
        let m = DegreeMatrix::materialize(&table, &vocab);

        assert_eq!(m.genes, vocab.to_vec());
        let mut sorted = m.genes.clone();
        sorted.sort();
        assert_eq!(m.genes, sorted);
        assert!(m.rows.iter().all(|r| r.degrees.len() == m.genes.len()));
    }

    #[test]
    fn no_phantom_rows_for_unobserved_units() {
        let units = vec![
            unit(20, "brain", &[("A", "B")]),
            unit(40, "liver", &[("A", "B")]),
        ];
        let table = DegreeTable::from_units(&units);
        let m = DegreeMatrix::materialize(&table, &vocab_of(&units));

        let keys: Vec<(AgeGroup, &str)> = m.rows.iter().map(|r| (r.age, r.tissue.as_str())).collect();
        assert_eq!(keys, vec![(20, "brain"), (40, "liver")]);
        assert!(m.row(20, "liver").is_none());
    }

    #[test]
    fn zero_edge_units_give_zero_rows() {
        let units = vec![unit(20, "brain", &[]), unit(30, "brain", &[])];
        let table = DegreeTable::from_units(&units);
        let vocab: Vocabulary = ["G1", "G2"].into_iter().collect();
        let m = DegreeMatrix::materialize(&table, &vocab);

        assert_eq!(m.rows.len(), 2);
        assert!(m.rows.iter().all(|r| r.degrees == vec![0, 0]));
    }
}
