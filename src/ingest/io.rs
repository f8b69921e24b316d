use std::io::Read;

use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Edge;

/// Header names of the source and target gene columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeColumns {
    pub source: String,
    pub target: String,
}

impl Default for EdgeColumns {
    fn default() -> Self {
        Self {
            source: "GeneA".into(),
            target: "GeneB".into(),
        }
    }
}

/// Errors that make a whole unit unreadable.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error while reading '{path}': {source}")]
    IoPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{column}' in header")]
    MissingColumn { column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One edge record before validation. Empty or absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEdge {
    pub source_gene: Option<String>,
    pub target_gene: Option<String>,
}

impl RawEdge {
    pub fn new(source: Option<&str>, target: Option<&str>) -> Self {
        Self {
            source_gene: source.map(str::to_string),
            target_gene: target.map(str::to_string),
        }
    }

    /// Both identifiers must be present and non-blank.
    pub fn validate(self, line: u64) -> Result<Edge, MalformedRecord> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (present(self.source_gene), present(self.target_gene)) {
            (Some(s), Some(t)) => Ok(Edge::new(s, t)),
            (None, Some(_)) => Err(MalformedRecord::new(line, "missing source gene")),
            (Some(_), None) => Err(MalformedRecord::new(line, "missing target gene")),
            (None, None) => Err(MalformedRecord::new(line, "missing source and target genes")),
        }
    }
}

/// A record skipped inside an otherwise readable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// 1-based line in the unit (the header is line 1).
    pub line: u64,
    pub problem: String,
}

impl MalformedRecord {
    pub fn new(line: u64, problem: impl Into<String>) -> Self {
        Self {
            line,
            problem: problem.into(),
        }
    }
}

/// Edges of one unit plus the records that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUnit {
    pub edges: Vec<Edge>,
    pub malformed: Vec<MalformedRecord>,
}

impl ParsedUnit {
    /// Validate in-memory records; `line` is the record's 1-based position.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawEdge>,
    {
        let mut unit = ParsedUnit::default();
        for (i, raw) in records.into_iter().enumerate() {
            unit.push(raw.validate(i as u64 + 1));
        }
        unit
    }

    fn push(&mut self, rec: Result<Edge, MalformedRecord>) {
        match rec {
            Ok(edge) => self.edges.push(edge),
            Err(bad) => self.malformed.push(bad),
        }
    }
}

/// Streaming reader for a comma-separated edge list with a header row.
///
/// Only the configured source/target columns are read; any other columns
/// (weights, p-values, ...) are ignored. Short rows are allowed and reported
/// as malformed records.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use degree_trend::ingest::io::{EdgeColumns, EdgeReader};
///
/// let csv = "GeneA,GeneB,weight\nTP53,MDM2,0.4\nMDM2,\n";
/// let unit = EdgeReader::new(Cursor::new(csv), &EdgeColumns::default())
///     .unwrap()
///     .read_all()
///     .unwrap();
///
/// assert_eq!(unit.edges.len(), 1);
/// assert_eq!(unit.malformed.len(), 1);
/// ```
pub struct EdgeReader<R: Read> {
    inner: csv::Reader<R>,
    headers: StringRecord,
}

impl<R: Read> EdgeReader<R> {
    pub fn new(reader: R, columns: &EdgeColumns) -> Result<Self, IngestError> {
        let mut inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let found = inner.headers()?.clone();
        let find = |name: &str| {
            found
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| IngestError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let source_idx = find(&columns.source)?;
        let target_idx = find(&columns.target)?;

        // Rename the two configured columns to the field names of `RawEdge`.
        let headers: StringRecord = found
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == source_idx {
                    "source_gene"
                } else if i == target_idx {
                    "target_gene"
                } else if h == "source_gene" || h == "target_gene" {
                    ""
                } else {
                    h
                }
            })
            .collect();

        Ok(Self { inner, headers })
    }

    /// Read every remaining record.
    ///
    /// A record that fails validation is kept as a `MalformedRecord`; an I/O or
    /// framing error aborts the unit.
    pub fn read_all(mut self) -> Result<ParsedUnit, IngestError> {
        let mut unit = ParsedUnit::default();
        let mut record = StringRecord::new();

        while self.inner.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let parsed = record
                .deserialize::<RawEdge>(Some(&self.headers))
                .map_err(|e| MalformedRecord::new(line, e.to_string()))
                .and_then(|raw| raw.validate(line));
            unit.push(parsed);
        }

        Ok(unit)
    }
}

/// Convenience: parse one unit from any reader.
pub fn parse_edges<R: Read>(reader: R, columns: &EdgeColumns) -> Result<ParsedUnit, IngestError> {
    EdgeReader::new(reader, columns)?.read_all()
}
