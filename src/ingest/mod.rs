pub mod io;
pub mod layout;

pub use io::{EdgeColumns, EdgeReader, IngestError, MalformedRecord, ParsedUnit, RawEdge};
pub use layout::{CorpusConfig, UnitSource};

use tracing::{debug, warn};

use crate::model::{Diagnostic, Report, Vocabulary};
use crate::types::{AgeGroup, Edge};

/// The validated edges of one (age group, tissue) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeUnit {
    pub age: AgeGroup,
    pub tissue: String,
    pub edges: Vec<Edge>,
}

/// Everything ingestion hands to aggregation.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub units: Vec<EdgeUnit>,
    pub vocabulary: Vocabulary,
    pub report: Report,
}

/// Collects parsed units into a [`Corpus`].
///
/// Every gene seen (source or target) joins the vocabulary. Skipped records and
/// units become diagnostics; nothing here aborts the batch.
#[derive(Debug, Default)]
pub struct Ingestor {
    corpus: Corpus,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a parsed unit. `origin` names where it came from (usually a path).
    pub fn accept(&mut self, age: AgeGroup, tissue: &str, origin: &str, parsed: ParsedUnit) {
        for bad in parsed.malformed {
            warn!(age, tissue, origin, line = bad.line, problem = %bad.problem, "skipping malformed edge");
            self.corpus.report.push(Diagnostic::MalformedEdge {
                age,
                tissue: tissue.to_string(),
                origin: origin.to_string(),
                line: bad.line,
                problem: bad.problem,
            });
        }

        for edge in &parsed.edges {
            self.corpus.vocabulary.add_edge(edge);
        }

        debug!(age, tissue, origin, edges = parsed.edges.len(), "unit ingested");
        self.corpus.report.units_read += 1;
        self.corpus.report.edges_read += parsed.edges.len();
        self.corpus.units.push(EdgeUnit {
            age,
            tissue: tissue.to_string(),
            edges: parsed.edges,
        });
    }

    /// Validate and accept in-memory records for one unit.
    pub fn ingest_records<I>(&mut self, age: AgeGroup, tissue: &str, origin: &str, records: I)
    where
        I: IntoIterator<Item = RawEdge>,
    {
        self.accept(age, tissue, origin, ParsedUnit::from_records(records));
    }

    /// Record a unit that could not be read at all.
    pub fn reject(&mut self, age: AgeGroup, tissue: &str, origin: &str, err: &IngestError) {
        warn!(age, tissue, origin, error = %err, "skipping unreadable unit");
        self.corpus.report.push(Diagnostic::UnreadableUnit {
            age,
            tissue: tissue.to_string(),
            origin: origin.to_string(),
            reason: err.to_string(),
        });
    }

    pub fn note(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.corpus.report.push(diagnostic);
    }

    pub fn finish(self) -> Corpus {
        self.corpus
    }
}
