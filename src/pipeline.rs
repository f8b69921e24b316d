use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::aggregate::DegreeTable;
use crate::change::ChangeMatrix;
use crate::ingest::{Corpus, CorpusConfig};
use crate::matrix::DegreeMatrix;
use crate::model::{Report, Vocabulary};
use crate::sink;
use crate::types::AgeGroups;

/// Everything one batch run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub vocabulary: Vocabulary,
    pub table: DegreeTable,
    pub degree_matrix: DegreeMatrix,
    pub change_matrix: ChangeMatrix,
    pub report: Report,
}

/// Aggregate an ingested corpus and derive both matrices.
///
/// Workflow:
/// 1) record every unit into one degree table
/// 2) zero-fill it against the vocabulary (degree matrix)
/// 3) walk each (tissue, gene) across the age groups (change matrix)
pub fn analyze(corpus: Corpus, age_groups: &AgeGroups) -> Analysis {
    let Corpus {
        units,
        mut vocabulary,
        report,
    } = corpus;

    for unit in &units {
        // a hand-built corpus may carry a partial vocabulary
        for edge in &unit.edges {
            vocabulary.add_edge(edge);
        }
        if age_groups.position(unit.age).is_none() {
            warn!(age = unit.age, tissue = %unit.tissue, "age group is not part of the lifecycle; it only appears in the degree matrix");
        }
    }

    let table = DegreeTable::from_units(&units);
    let degree_matrix = DegreeMatrix::materialize(&table, &vocabulary);
    let change_matrix = ChangeMatrix::build(&table, &vocabulary, age_groups);

    Analysis {
        vocabulary,
        table,
        degree_matrix,
        change_matrix,
        report,
    }
}

/// Read `<base>/<age>/*.csv` and analyze it.
pub fn analyze_dir(base: &Path, config: &CorpusConfig) -> Analysis {
    let corpus = config.read_dir(base);
    let analysis = analyze(corpus, &config.age_groups);

    info!("{}", analysis.report);
    info!("{}", analysis.table.to_string().trim_end());
    if analysis.table.is_empty() {
        warn!(base = %base.display(), "no edge lists were read; output tables will be empty");
    }

    analysis
}

/// Write the degree and change matrices as CSV.
pub fn write_matrices(analysis: &Analysis, degree_out: &Path, change_out: &Path) -> Result<()> {
    let f = sink::create_file(degree_out)
        .with_context(|| format!("create {}", degree_out.display()))?;
    sink::write_degree_matrix(&analysis.degree_matrix, f)
        .with_context(|| format!("write degree matrix to {}", degree_out.display()))?;
    info!(
        path = %degree_out.display(),
        rows = analysis.degree_matrix.rows.len(),
        genes = analysis.degree_matrix.genes.len(),
        "degree matrix written"
    );

    let f = sink::create_file(change_out)
        .with_context(|| format!("create {}", change_out.display()))?;
    sink::write_change_matrix(&analysis.change_matrix, f)
        .with_context(|| format!("write change matrix to {}", change_out.display()))?;
    info!(
        path = %change_out.display(),
        rows = analysis.change_matrix.rows.len(),
        "change matrix written"
    );

    Ok(())
}
