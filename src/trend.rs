use std::cmp::Ordering;

use crate::change::{ChangeMatrix, ChangeRow};
use crate::types::Change;

/// `sum(changes) / transitions`, in [-1, 1].
///
/// `transitions` is the full lifecycle's transition count, never the number of
/// transitions a tissue actually has data for. A lifecycle without transitions
/// scores 0.
pub fn score(changes: &[Change], transitions: usize) -> f64 {
    if transitions == 0 {
        return 0.0;
    }
    let sum: i64 = changes.iter().map(|c| c.value() as i64).sum();
    sum as f64 / transitions as f64
}

/// One entry of a tissue's ranked series.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGene {
    pub gene: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Drop genes whose score is exactly 0.
    pub nonzero_only: bool,
}

/// Genes of `tissue`, most consistently increasing first.
///
/// Ties are ordered by gene name so the series is reproducible.
pub fn rank_tissue(matrix: &ChangeMatrix, tissue: &str, opts: RankOptions) -> Vec<RankedGene> {
    let d = matrix.transition_count();

    let mut ranked: Vec<RankedGene> = matrix
        .rows
        .iter()
        .filter(|r| r.tissue == tissue)
        .map(|r| RankedGene {
            gene: r.gene.clone(),
            score: r.trend_score(d),
        })
        .filter(|g| !opts.nonzero_only || g.score != 0.0)
        .collect();

    ranked.sort_by(by_score_desc);
    ranked
}

/// Every row with its score, in matrix order.
pub fn score_rows(matrix: &ChangeMatrix) -> Vec<(&ChangeRow, f64)> {
    let d = matrix.transition_count();
    matrix.rows.iter().map(|r| (r, r.trend_score(d))).collect()
}

fn by_score_desc(a: &RankedGene, b: &RankedGene) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.gene.cmp(&b.gene))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgeGroups;

    fn changes(values: &[i64]) -> Vec<Change> {
        values.iter().map(|&v| Change::from_value(v).unwrap()).collect()
    }

    #[test]
    fn score_examples() {
        assert_eq!(score(&changes(&[0, 0, 0, 0, 0]), 5), 0.0);
        assert_eq!(score(&changes(&[1, 1, 1, 1, 1]), 5), 1.0);
        assert_eq!(score(&changes(&[1, -1, 0, 0, 0]), 5), 0.0);
        assert_eq!(score(&changes(&[-1, -1, -1, -1, -1]), 5), -1.0);
        assert_eq!(score(&changes(&[1, 0, 0, 0, 0]), 5), 0.2);
    }

    #[test]
    fn divisor_is_not_reduced_for_sparse_tissues() {
        // a tissue seen only at two age groups still divides by the full lifecycle
        assert_eq!(score(&changes(&[1]), 5), 0.2);
        assert_eq!(score(&[], 0), 0.0);
    }

    #[test]
    fn ranking_sorts_descending_with_name_ties() {
        let row = |tissue: &str, gene: &str, v: &[i64]| ChangeRow {
            tissue: tissue.into(),
            gene: gene.into(),
            changes: changes(v),
        };
        let m = ChangeMatrix {
            age_groups: AgeGroups::default(),
            rows: vec![
                row("brain", "C", &[0, 0, 0, 0, 0]),
                row("brain", "B", &[1, 1, 0, 0, 0]),
                row("brain", "A", &[1, 0, 1, 0, 0]),
                row("brain", "D", &[-1, 0, 0, 0, 0]),
                row("liver", "A", &[1, 1, 1, 1, 1]),
            ],
        };

        let ranked = rank_tissue(&m, "brain", RankOptions::default());
        let genes: Vec<&str> = ranked.iter().map(|g| g.gene.as_str()).collect();
        assert_eq!(genes, vec!["A", "B", "C", "D"]);
        assert_eq!(ranked[0].score, 0.4);
        assert_eq!(ranked[3].score, -0.2);

        let nonzero = rank_tissue(&m, "brain", RankOptions { nonzero_only: true });
        assert_eq!(nonzero.len(), 3);
        assert!(rank_tissue(&m, "kidney", RankOptions::default()).is_empty());

        let all = score_rows(&m);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].1, 1.0);
    }
}
