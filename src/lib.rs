//! degree_trend
//!
//! Longitudinal gene in-degree summaries from per-age-group, per-tissue
//! gene-interaction edge lists:
//! - a dense in-degree matrix (one row per observed age group and tissue)
//! - a ternary change matrix (one row per tissue and gene, one column per
//!   consecutive age-group transition)
//! - per-tissue trend scores ranking the most consistently rising genes

pub mod types;
pub mod model;
pub mod ingest;
pub mod aggregate;
pub mod matrix;
pub mod change;
pub mod trend;
pub mod sink;
pub mod pipeline;

pub use aggregate::DegreeTable;
pub use change::{ChangeMatrix, ChangeRow};
pub use ingest::{Corpus, CorpusConfig, EdgeColumns, EdgeUnit, Ingestor};
pub use matrix::{DegreeMatrix, DegreeRow};
pub use model::{Diagnostic, Report, Vocabulary};
pub use pipeline::{analyze, analyze_dir, Analysis};
pub use trend::{rank_tissue, RankOptions, RankedGene};
pub use types::{AgeGroup, AgeGroups, Change, Edge};
