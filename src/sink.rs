use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::change::{ChangeMatrix, ChangeRow};
use crate::matrix::DegreeMatrix;
use crate::trend::{score_rows, RankedGene};
use crate::types::{parse_transition_label, AgeGroupError, AgeGroups, Change};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on '{path}': {source}")]
    IoPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed change matrix header: {reason}")]
    BadHeader { reason: String },

    #[error("line {line}: invalid change value '{value}'")]
    BadValue { line: u64, value: String },

    #[error(transparent)]
    AgeGroups(#[from] AgeGroupError),
}

/// Create `path` (and its parent folders) for buffered writing.
pub fn create_file(path: &Path) -> Result<BufWriter<File>, SinkError> {
    let io_err = |source| SinkError::IoPath {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map(BufWriter::new).map_err(io_err)
}

pub fn open_file(path: &Path) -> Result<File, SinkError> {
    File::open(path).map_err(|source| SinkError::IoPath {
        path: path.display().to_string(),
        source,
    })
}

/// Scores are written as `1.0`, `0.2`, `-0.4`.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

pub fn write_degree_matrix<W: Write>(matrix: &DegreeMatrix, writer: W) -> Result<(), SinkError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(matrix.header())?;

    for row in &matrix.rows {
        let mut rec = Vec::with_capacity(row.degrees.len() + 2);
        rec.push(row.age.to_string());
        rec.push(row.tissue.clone());
        rec.extend(row.degrees.iter().map(|d| d.to_string()));
        wtr.write_record(&rec)?;
    }

    wtr.flush().map_err(|source| SinkError::IoPath {
        path: "<degree matrix>".to_string(),
        source,
    })
}

pub fn write_change_matrix<W: Write>(matrix: &ChangeMatrix, writer: W) -> Result<(), SinkError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(matrix.header())?;

    for row in &matrix.rows {
        wtr.write_record(&change_record(row))?;
    }

    wtr.flush().map_err(|source| SinkError::IoPath {
        path: "<change matrix>".to_string(),
        source,
    })
}

/// The change matrix with a trailing `TrendScore` column, every tissue included.
pub fn write_scored_changes<W: Write>(matrix: &ChangeMatrix, writer: W) -> Result<(), SinkError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = matrix.header();
    header.push("TrendScore".to_string());
    wtr.write_record(&header)?;

    for (row, score) in score_rows(matrix) {
        let mut rec = change_record(row);
        rec.push(format_score(score));
        wtr.write_record(&rec)?;
    }

    wtr.flush().map_err(|source| SinkError::IoPath {
        path: "<scored changes>".to_string(),
        source,
    })
}

/// `Gene, TrendScore` in ranked order.
pub fn write_ranked<W: Write>(ranked: &[RankedGene], writer: W) -> Result<(), SinkError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Gene", "TrendScore"])?;
    for g in ranked {
        wtr.write_record([g.gene.as_str(), format_score(g.score).as_str()])?;
    }
    wtr.flush().map_err(|source| SinkError::IoPath {
        path: "<ranked series>".to_string(),
        source,
    })
}

/// Read a change matrix written by [`write_change_matrix`].
///
/// The age groups are recovered from the `Change_<a>_to_<b>` columns, which must
/// form one consecutive chain. Extra columns (a previous `TrendScore`, say) are
/// ignored.
pub fn read_change_matrix<R: Read>(reader: R) -> Result<ChangeMatrix, SinkError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SinkError::BadHeader {
                reason: format!("missing '{name}' column"),
            })
    };
    let tissue_idx = column("Tissue")?;
    let gene_idx = column("Gene")?;

    let mut change_cols: Vec<usize> = Vec::new();
    let mut ages = Vec::new();
    for (i, h) in headers.iter().enumerate() {
        let Some((a, b)) = parse_transition_label(h) else {
            continue;
        };
        match ages.last() {
            None => ages.push(a),
            Some(&last) if last == a => {}
            Some(&last) => {
                return Err(SinkError::BadHeader {
                    reason: format!("transition '{h}' does not continue from age group {last}"),
                })
            }
        }
        ages.push(b);
        change_cols.push(i);
    }
    if change_cols.is_empty() {
        return Err(SinkError::BadHeader {
            reason: "no Change_<a>_to_<b> columns".to_string(),
        });
    }
    let age_groups = AgeGroups::new(ages)?;

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| rec.get(i).unwrap_or("");

        let changes = change_cols
            .iter()
            .map(|&i| {
                let raw = field(i);
                raw.parse::<i64>()
                    .ok()
                    .and_then(Change::from_value)
                    .ok_or_else(|| SinkError::BadValue {
                        line,
                        value: raw.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(ChangeRow {
            tissue: field(tissue_idx).to_string(),
            gene: field(gene_idx).to_string(),
            changes,
        });
    }

    Ok(ChangeMatrix { age_groups, rows })
}

fn change_record(row: &ChangeRow) -> Vec<String> {
    let mut rec = Vec::with_capacity(row.changes.len() + 2);
    rec.push(row.tissue.clone());
    rec.push(row.gene.clone());
    rec.extend(row.changes.iter().map(|c| c.to_string()));
    rec
}
