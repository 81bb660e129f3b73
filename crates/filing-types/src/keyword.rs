//! Target keywords and per-keyword line counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of terms the violation detector looks for.
///
/// Each variant matches a case-sensitive substring, so `Waiv` covers
/// "waive", "waiver" and "waived" alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Keyword {
    #[serde(rename = "covenant")]
    Covenant,
    #[serde(rename = "waiv")]
    Waiv,
    #[serde(rename = "viol")]
    Viol,
    #[serde(rename = "in default")]
    InDefault,
    #[serde(rename = "modif")]
    Modif,
    #[serde(rename = "not in compliance")]
    NotInCompliance,
}

impl Keyword {
    /// All keywords, covenant first
    pub const ALL: [Keyword; 6] = [
        Keyword::Covenant,
        Keyword::Waiv,
        Keyword::Viol,
        Keyword::InDefault,
        Keyword::Modif,
        Keyword::NotInCompliance,
    ];

    /// The substring this keyword matches
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Covenant => "covenant",
            Keyword::Waiv => "waiv",
            Keyword::Viol => "viol",
            Keyword::InDefault => "in default",
            Keyword::Modif => "modif",
            Keyword::NotInCompliance => "not in compliance",
        }
    }

    /// Whether this keyword is the anchor the others are measured against
    pub fn is_anchor(&self) -> bool {
        matches!(self, Keyword::Covenant)
    }

    /// Keywords other than the anchor
    pub fn risk_terms() -> impl Iterator<Item = Keyword> {
        Self::ALL.into_iter().filter(|k| !k.is_anchor())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of lines per keyword.
///
/// Every keyword always has an entry, zero when it never occurred. Used both
/// for a single document and for the running total across a whole scan; the
/// two are combined with [`KeywordCounts::merge`], which is commutative and
/// associative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Keyword, u64>", into = "BTreeMap<Keyword, u64>")]
pub struct KeywordCounts {
    counts: BTreeMap<Keyword, u64>,
}

impl KeywordCounts {
    /// All six keywords at zero
    pub fn new() -> Self {
        Self {
            counts: Keyword::ALL.into_iter().map(|k| (k, 0)).collect(),
        }
    }

    pub fn get(&self, keyword: Keyword) -> u64 {
        self.counts.get(&keyword).copied().unwrap_or(0)
    }

    pub fn set(&mut self, keyword: Keyword, count: u64) {
        self.counts.insert(keyword, count);
    }

    pub fn add(&mut self, keyword: Keyword, count: u64) {
        *self.counts.entry(keyword).or_insert(0) += count;
    }

    /// Fold another set of counts into this one
    pub fn merge(&mut self, other: &KeywordCounts) {
        for (keyword, count) in other.iter() {
            self.add(keyword, count);
        }
    }

    /// Consuming variant of [`merge`](Self::merge), handy in folds
    pub fn merged(mut self, other: &KeywordCounts) -> Self {
        self.merge(other);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Keyword, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl Default for KeywordCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<Keyword, u64>> for KeywordCounts {
    fn from(map: BTreeMap<Keyword, u64>) -> Self {
        let mut counts = Self::new();
        for (keyword, count) in map {
            counts.set(keyword, count);
        }
        counts
    }
}

impl From<KeywordCounts> for BTreeMap<Keyword, u64> {
    fn from(counts: KeywordCounts) -> Self {
        counts.counts
    }
}
