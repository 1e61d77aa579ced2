use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

// ── Names ──────────────────────────────────────────────────────────

/// Canonical author key: lowercased, whitespace-collapsed.
///
/// Can only be constructed through [`NormalizedName::new`], so every value
/// satisfies `normalize(name) == name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NormalizedName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

// ── Raw records ────────────────────────────────────────────────────

/// Identifier of a record in the literature service (a `PubMed` PMID).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub String);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One author entry as the service reports it. Either component may be missing
/// (collective authors, incomplete records).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub fore_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl RawAuthor {
    pub fn new(fore_name: &str, last_name: &str) -> Self {
        Self {
            fore_name: Some(fore_name.to_string()),
            last_name: Some(last_name.to_string()),
        }
    }

    /// "Given Family", or `None` when either component is missing or blank.
    pub fn display_name(&self) -> Option<String> {
        let fore = self.fore_name.as_deref().map(str::trim)?;
        let last = self.last_name.as_deref().map(str::trim)?;
        if fore.is_empty() || last.is_empty() {
            return None;
        }
        Some(format!("{fore} {last}"))
    }
}

/// A fetched record before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    pub id: ArticleId,
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
}

// ── Articles ───────────────────────────────────────────────────────

/// The co-authors of one bibliographic record, normalized.
///
/// Immutable once built. Order is kept as reported but carries no meaning
/// beyond "everyone here co-authored together".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    authors: Vec<NormalizedName>,
}

impl Article {
    /// Build an article from raw name strings, normalizing each one.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            authors: names
                .into_iter()
                .map(|n| NormalizedName::new(n.as_ref()))
                .collect(),
        }
    }

    pub fn from_normalized(authors: Vec<NormalizedName>) -> Self {
        Self { authors }
    }

    pub fn authors(&self) -> &[NormalizedName] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Authors with repeats removed, first occurrence wins.
    pub fn distinct_authors(&self) -> Vec<&NormalizedName> {
        let mut seen = HashSet::with_capacity(self.authors.len());
        self.authors.iter().filter(|a| seen.insert(*a)).collect()
    }
}

// ── Target authors ─────────────────────────────────────────────────

/// Normalized forms of the names that were searched for.
///
/// Decides emphasis only; a target may or may not appear in the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetAuthorSet {
    names: HashSet<NormalizedName>,
}

impl TargetAuthorSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| NormalizedName::new(n.as_ref()))
                .collect(),
        }
    }

    pub fn contains(&self, name: &NormalizedName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
