use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::ingest::EdgeUnit;
use crate::types::{AgeGroup, Edge};

/// Internal numeric IDs (indexes into the name Vecs).
pub type TissueId = usize;
pub type GeneId = usize;

/// Sparse in-degree counts for every (age group, tissue, gene).
///
/// Design:
/// - tissue and gene names are interned once; counts live in one flat map keyed
///   by the composite `(age, tissue_id, gene_id)`.
/// - a key that was never incremented reads as 0.
/// - `units` remembers which (age group, tissue) pairs were observed, including
///   units that contributed no edges.
///
/// Accumulation is commutative: any order of `record` calls yields an equal table.
#[derive(Debug, Clone, Default)]
pub struct DegreeTable {
    tissue_names: Vec<String>,
    tissue_to_id: HashMap<String, TissueId>,

    gene_names: Vec<String>,
    gene_to_id: HashMap<String, GeneId>,

    units: HashSet<(AgeGroup, TissueId)>,
    counts: HashMap<(AgeGroup, TissueId, GeneId), u64>,

    edges: u64,
}

impl DegreeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a batch of units.
    pub fn from_units<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = &'a EdgeUnit>,
    {
        let mut table = DegreeTable::new();
        for unit in units {
            table.record_unit(unit);
        }
        table
    }

    /// Mark (age, tissue) observed without adding any edge.
    pub fn observe(&mut self, age: AgeGroup, tissue: &str) -> TissueId {
        let tid = self.intern_tissue(tissue);
        self.units.insert((age, tid));
        tid
    }

    /// One edge: the target's in-degree for (age, tissue) grows by one.
    ///
    /// Repeated edges count every time.
    pub fn record(&mut self, age: AgeGroup, tissue: &str, edge: &Edge) {
        let tid = self.observe(age, tissue);
        let gid = self.intern_gene(&edge.target);
        *self.counts.entry((age, tid, gid)).or_insert(0) += 1;
        self.edges += 1;
    }

    pub fn record_unit(&mut self, unit: &EdgeUnit) {
        self.observe(unit.age, &unit.tissue);
        for edge in &unit.edges {
            self.record(unit.age, &unit.tissue, edge);
        }
    }

    /// Fold another table into this one. Any merge order gives the same result.
    pub fn merge(&mut self, other: &DegreeTable) {
        for &(age, tid) in &other.units {
            self.observe(age, &other.tissue_names[tid]);
        }
        for (&(age, tid, gid), &n) in &other.counts {
            let tid = self.intern_tissue(&other.tissue_names[tid]);
            let gid = self.intern_gene(&other.gene_names[gid]);
            *self.counts.entry((age, tid, gid)).or_insert(0) += n;
        }
        self.edges += other.edges;
    }

    /// In-degree of `gene`; 0 for anything never recorded.
    pub fn degree(&self, age: AgeGroup, tissue: &str, gene: &str) -> u64 {
        let (Some(&tid), Some(&gid)) = (self.tissue_to_id.get(tissue), self.gene_to_id.get(gene)) else {
            return 0;
        };
        self.counts.get(&(age, tid, gid)).copied().unwrap_or(0)
    }

    pub fn is_observed(&self, age: AgeGroup, tissue: &str) -> bool {
        self.tissue_to_id
            .get(tissue)
            .map(|&tid| self.units.contains(&(age, tid)))
            .unwrap_or(false)
    }

    /// Observed units ordered by age group, then tissue name.
    pub fn units(&self) -> Vec<(AgeGroup, &str)> {
        let mut out: Vec<(AgeGroup, &str)> = self
            .units
            .iter()
            .map(|&(age, tid)| (age, self.tissue_names[tid].as_str()))
            .collect();
        out.sort_unstable();
        out
    }

    /// Tissues observed at any age group, sorted by name.
    pub fn tissues(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.tissue_names.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn edge_count(&self) -> u64 {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Name-keyed copy of the non-zero counts, independent of interning order.
    pub fn snapshot(&self) -> BTreeMap<(AgeGroup, String, String), u64> {
        self.counts
            .iter()
            .map(|(&(age, tid, gid), &n)| {
                (
                    (age, self.tissue_names[tid].clone(), self.gene_names[gid].clone()),
                    n,
                )
            })
            .collect()
    }

    fn intern_tissue(&mut self, tissue: &str) -> TissueId {
        if let Some(&id) = self.tissue_to_id.get(tissue) {
            return id;
        }
        let id = self.tissue_names.len();
        self.tissue_names.push(tissue.to_string());
        self.tissue_to_id.insert(tissue.to_string(), id);
        id
    }

    fn intern_gene(&mut self, gene: &str) -> GeneId {
        if let Some(&id) = self.gene_to_id.get(gene) {
            return id;
        }
        let id = self.gene_names.len();
        self.gene_names.push(gene.to_string());
        self.gene_to_id.insert(gene.to_string(), id);
        id
    }
}

/// Two tables are equal when they observed the same units and hold the same
/// counts, whatever order the names were interned in.
impl PartialEq for DegreeTable {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
            && self.units() == other.units()
            && self.snapshot() == other.snapshot()
    }
}

impl Eq for DegreeTable {}

/// Human-readable summary for logging:
/// one global line, then one line per tissue with the age groups it was
/// observed at and its edge/target-gene counts.
impl fmt::Display for DegreeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DegreeTable: {} units, {} tissues, {} targeted genes, {} edges",
            self.units.len(),
            self.tissue_names.len(),
            self.gene_names.len(),
            self.edges
        )?;

        for tissue in self.tissues() {
            let tid = self.tissue_to_id[tissue];

            let ages: BTreeSet<AgeGroup> = self
                .units
                .iter()
                .filter(|&&(_, t)| t == tid)
                .map(|&(age, _)| age)
                .collect();

            let mut edges: u64 = 0;
            let mut genes: HashSet<GeneId> = HashSet::new();
            for (&(_, t, gid), &n) in &self.counts {
                if t == tid {
                    edges += n;
                    genes.insert(gid);
                }
            }

            let ages: Vec<String> = ages.iter().map(|a| a.to_string()).collect();
            writeln!(
                f,
                "  - {}: ages=[{}], edges={}, targeted genes={}",
                tissue,
                ages.join(","),
                edges,
                genes.len()
            )?;
        }

        Ok(())
    }
}
