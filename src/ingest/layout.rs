use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use rayon::prelude::*;
use tracing::info;

use crate::ingest::io::{parse_edges, EdgeColumns, IngestError, ParsedUnit};
use crate::ingest::{Corpus, Ingestor};
use crate::model::Diagnostic;
use crate::types::{AgeGroup, AgeGroups};

/// Reads a corpus laid out as `<base>/<age>/<tissue>_<suffix>.csv[.gz]`.
///
/// - one folder per configured age group, named by its label (`20`, `30`, ...)
/// - one edge list per tissue inside it
/// - configurable source/target header names
#[derive(Debug, Clone, Default)]
pub struct CorpusConfig {
    pub age_groups: AgeGroups,
    pub columns: EdgeColumns,
}

impl CorpusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age_groups(mut self, age_groups: AgeGroups) -> Self {
        self.age_groups = age_groups;
        self
    }

    /// Header of the source gene column (default `GeneA`).
    pub fn source_column(mut self, name: &str) -> Self {
        self.columns.source = name.to_string();
        self
    }

    /// Header of the target gene column (default `GeneB`).
    pub fn target_column(mut self, name: &str) -> Self {
        self.columns.target = name.to_string();
        self
    }

    /// Locate, parse and collect every unit under `base`.
    ///
    /// Files are parsed in parallel; units are then accepted serially in
    /// (age group, tissue, path) order so the corpus never depends on scheduling.
    pub fn read_dir<P: AsRef<Path>>(&self, base: P) -> Corpus {
        let base = base.as_ref();
        let mut ingestor = Ingestor::new();

        let sources = discover_units(base, &self.age_groups, &mut ingestor);
        info!(base = %base.display(), units = sources.len(), "reading edge lists");

        let parsed: Vec<(UnitSource, Result<ParsedUnit, IngestError>)> = sources
            .into_par_iter()
            .map(|src| {
                let res = read_unit(&src.path, &self.columns);
                (src, res)
            })
            .collect();

        for (src, res) in parsed {
            let origin = src.path.display().to_string();
            match res {
                Ok(unit) => ingestor.accept(src.age, &src.tissue, &origin, unit),
                Err(e) => ingestor.reject(src.age, &src.tissue, &origin, &e),
            }
        }

        ingestor.finish()
    }
}

/// One edge-list file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSource {
    pub age: AgeGroup,
    pub tissue: String,
    pub path: PathBuf,
}

/// List the edge-list files of every configured age group.
///
/// Missing or unlistable age folders are noted and skipped.
pub fn discover_units(base: &Path, ages: &AgeGroups, ingestor: &mut Ingestor) -> Vec<UnitSource> {
    let mut out = Vec::new();

    for &age in ages.as_slice() {
        let folder = base.join(age.to_string());
        let missing = |reason: String| Diagnostic::MissingAgeFolder {
            age,
            path: folder.display().to_string(),
            reason,
        };

        if !folder.is_dir() {
            ingestor.note(missing("not found".to_string()));
            continue;
        }

        let entries = match std::fs::read_dir(&folder) {
            Ok(entries) => entries,
            Err(e) => {
                ingestor.note(missing(e.to_string()));
                continue;
            }
        };

        let mut found: Vec<UnitSource> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                let tissue = tissue_from_file_name(name)?;
                Some(UnitSource { age, tissue, path })
            })
            .collect();

        // read_dir order is platform dependent
        found.sort_by(|a, b| (&a.tissue, &a.path).cmp(&(&b.tissue, &b.path)));
        out.extend(found);
    }

    out
}

/// Tissue identifier from an edge-list file name.
///
/// The `.csv` / `.csv.gz` extension is removed, then the trailing `_<suffix>`
/// (normally the age label). Returns `None` for files that are not edge lists.
///
/// ```
/// use degree_trend::ingest::layout::tissue_from_file_name;
///
/// assert_eq!(tissue_from_file_name("brain_cortex_20.csv").as_deref(), Some("brain_cortex"));
/// assert_eq!(tissue_from_file_name("liver.csv.gz").as_deref(), Some("liver"));
/// assert_eq!(tissue_from_file_name("notes.txt"), None);
/// ```
pub fn tissue_from_file_name(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let stem_len = if lower.ends_with(".csv.gz") {
        name.len() - ".csv.gz".len()
    } else if lower.ends_with(".csv") {
        name.len() - ".csv".len()
    } else {
        return None;
    };

    let stem = &name[..stem_len];
    let tissue = match stem.rsplit_once('_') {
        Some((base, _)) if !base.is_empty() => base,
        _ => stem,
    };

    if tissue.is_empty() {
        None
    } else {
        Some(tissue.to_string())
    }
}

/// Open a unit for reading; `.gz` files are decompressed transparently.
pub fn open_unit(path: &Path) -> Result<Box<dyn Read + Send>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::IoPath {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_gz = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_unit(path: &Path, columns: &EdgeColumns) -> Result<ParsedUnit, IngestError> {
    let reader = open_unit(path)?;
    parse_edges(reader, columns)
}
