use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Age-group label in years, e.g. `20` for the cohort in its twenties.
pub type AgeGroup = u16;

/// Lifecycle used when no age groups are configured.
pub const DEFAULT_AGE_GROUPS: [AgeGroup; 6] = [20, 30, 40, 50, 60, 70];

/// Direction of a gene's in-degree between two consecutive age groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Change {
    Decrease,
    Unchanged,
    Increase,
}

impl Change {
    /// `sign(next - current)`. Equal degrees (both zero included) are `Unchanged`.
    #[inline]
    pub fn between(current: u64, next: u64) -> Self {
        match next.cmp(&current) {
            Ordering::Greater => Change::Increase,
            Ordering::Less => Change::Decrease,
            Ordering::Equal => Change::Unchanged,
        }
    }

    #[inline]
    pub fn value(self) -> i8 {
        match self {
            Change::Decrease => -1,
            Change::Unchanged => 0,
            Change::Increase => 1,
        }
    }

    pub fn from_value(v: i64) -> Option<Self> {
        match v {
            -1 => Some(Change::Decrease),
            0 => Some(Change::Unchanged),
            1 => Some(Change::Increase),
            _ => None,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A directed gene interaction. Only `target` contributes to in-degree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Both endpoints, source first.
    #[inline]
    pub fn genes(&self) -> [&str; 2] {
        [&self.source, &self.target]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeGroupError {
    #[error("at least one age group is required")]
    Empty,

    #[error("age groups must be strictly increasing: {previous} is followed by {next}")]
    NotIncreasing { previous: AgeGroup, next: AgeGroup },

    #[error("invalid age group label '{label}'")]
    BadLabel { label: String },
}

/// Ordered age-group lifecycle.
///
/// Labels are strictly increasing, so numeric order and lifecycle order agree.
/// Consecutive pairs define the transitions of the change matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AgeGroup>", into = "Vec<AgeGroup>")]
pub struct AgeGroups {
    groups: Vec<AgeGroup>,
}

impl AgeGroups {
    pub fn new(groups: Vec<AgeGroup>) -> Result<Self, AgeGroupError> {
        if groups.is_empty() {
            return Err(AgeGroupError::Empty);
        }
        for w in groups.windows(2) {
            if w[1] <= w[0] {
                return Err(AgeGroupError::NotIncreasing {
                    previous: w[0],
                    next: w[1],
                });
            }
        }
        Ok(Self { groups })
    }

    #[inline]
    pub fn as_slice(&self) -> &[AgeGroup] {
        &self.groups
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn position(&self, age: AgeGroup) -> Option<usize> {
        self.groups.binary_search(&age).ok()
    }

    /// Consecutive (current, next) pairs in lifecycle order.
    pub fn transitions(&self) -> impl Iterator<Item = (AgeGroup, AgeGroup)> + '_ {
        self.groups.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of transitions in the full lifecycle; the trend score divisor.
    #[inline]
    pub fn transition_count(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }

    /// Column names such as `Change_20_to_30`.
    pub fn transition_labels(&self) -> Vec<String> {
        self.transitions()
            .map(|(a, b)| transition_label(a, b))
            .collect()
    }
}

impl Default for AgeGroups {
    fn default() -> Self {
        Self {
            groups: DEFAULT_AGE_GROUPS.to_vec(),
        }
    }
}

impl TryFrom<Vec<AgeGroup>> for AgeGroups {
    type Error = AgeGroupError;

    fn try_from(groups: Vec<AgeGroup>) -> Result<Self, Self::Error> {
        Self::new(groups)
    }
}

impl From<AgeGroups> for Vec<AgeGroup> {
    fn from(ages: AgeGroups) -> Self {
        ages.groups
    }
}

/// Parses a comma-separated list such as `20,30,40`.
impl FromStr for AgeGroups {
    type Err = AgeGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<AgeGroup>().map_err(|_| AgeGroupError::BadLabel {
                    label: p.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(groups)
    }
}

impl fmt::Display for AgeGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.groups.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", labels.join(","))
    }
}

pub fn transition_label(current: AgeGroup, next: AgeGroup) -> String {
    format!("Change_{current}_to_{next}")
}

/// Inverse of [`transition_label`].
pub fn parse_transition_label(label: &str) -> Option<(AgeGroup, AgeGroup)> {
    let rest = label.strip_prefix("Change_")?;
    let (a, b) = rest.split_once("_to_")?;
    Some((a.parse().ok()?, b.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_is_sign_of_difference() {
        assert_eq!(Change::between(1, 2), Change::Increase);
        assert_eq!(Change::between(5, 0), Change::Decrease);
        assert_eq!(Change::between(3, 3), Change::Unchanged);
        assert_eq!(Change::between(0, 0), Change::Unchanged);
        assert_eq!(Change::Decrease.value(), -1);
        assert_eq!(Change::from_value(1), Some(Change::Increase));
        assert_eq!(Change::from_value(2), None);
    }

    #[test]
    fn default_lifecycle_has_five_transitions() {
        let ages = AgeGroups::default();
        assert_eq!(ages.len(), 6);
        assert_eq!(ages.transition_count(), 5);
        assert_eq!(
            ages.transition_labels(),
            vec![
                "Change_20_to_30",
                "Change_30_to_40",
                "Change_40_to_50",
                "Change_50_to_60",
                "Change_60_to_70",
            ]
        );
        assert_eq!(ages.position(50), Some(3));
        assert_eq!(ages.position(55), None);
    }

    #[test]
    fn age_groups_must_increase() {
        assert_eq!(AgeGroups::new(vec![]), Err(AgeGroupError::Empty));
        assert_eq!(
            AgeGroups::new(vec![20, 40, 30]),
            Err(AgeGroupError::NotIncreasing { previous: 40, next: 30 })
        );
        assert!(AgeGroups::new(vec![20, 20]).is_err());
        assert_eq!(AgeGroups::new(vec![20]).unwrap().transition_count(), 0);
    }

    #[test]
    fn deserialized_age_groups_are_validated() {
        use serde::de::value::{Error as ValueError, SeqDeserializer};
        use serde::de::IntoDeserializer;

        let de: SeqDeserializer<_, ValueError> = vec![20u16, 30].into_deserializer();
        assert_eq!(AgeGroups::deserialize(de).unwrap().as_slice(), &[20, 30]);

        let de: SeqDeserializer<_, ValueError> = vec![30u16, 20].into_deserializer();
        let err = AgeGroups::deserialize(de).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));

        let de: SeqDeserializer<_, ValueError> = Vec::<u16>::new().into_deserializer();
        assert!(AgeGroups::deserialize(de).is_err());

        assert_eq!(
            AgeGroups::try_from(vec![30, 20]),
            Err(AgeGroupError::NotIncreasing { previous: 30, next: 20 })
        );
        assert_eq!(Vec::from(AgeGroups::default()), DEFAULT_AGE_GROUPS.to_vec());
    }

    #[test]
    fn age_groups_parse_from_list() {
        let ages: AgeGroups = "20, 30,40".parse().unwrap();
        assert_eq!(ages.as_slice(), &[20, 30, 40]);
        assert_eq!(ages.to_string(), "20,30,40");
        assert!(matches!(
            "20,x".parse::<AgeGroups>(),
            Err(AgeGroupError::BadLabel { .. })
        ));
    }

    #[test]
    fn transition_labels_round_trip() {
        assert_eq!(parse_transition_label("Change_60_to_70"), Some((60, 70)));
        assert_eq!(parse_transition_label("F_Value"), None);
        assert_eq!(parse_transition_label("Change_a_to_70"), None);
    }
}
