use serde::Serialize;

use crate::normalize::{normalize_name, normalize_phone};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single business row. Identity is its position in the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Cells of the columns the engine does not interpret, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            link: None,
            extra: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Comparison key for duplicate detection.
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::of(self)
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// (normalized_name, normalized_phone). Never stored, recomputed per call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey {
    pub name: String,
    pub phone: String,
}

impl NormalizedKey {
    pub fn of(record: &Record) -> Self {
        Self {
            name: normalize_name(&record.name),
            phone: normalize_phone(&record.phone),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification output
// ---------------------------------------------------------------------------

/// A record involved in a partial duplicate, with its original values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateAnnotation {
    pub name: String,
    pub phone: String,
}

impl DuplicateAnnotation {
    /// Comparison key of the annotated values.
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey {
            name: normalize_name(&self.name),
            phone: normalize_phone(&self.phone),
        }
    }
}

/// Records sharing one full key. `rows` are 0-based input positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExactGroup {
    pub name: String,
    pub phone: String,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// First record per distinct key, in input order.
    pub records: Vec<Record>,
    /// Total records belonging to any exact group, representatives included.
    pub exact_count: usize,
    pub partial: Vec<DuplicateAnnotation>,
    pub exact_groups: Vec<ExactGroup>,
}

impl Classification {
    /// Records dropped by the dedup step.
    pub fn removed(&self) -> usize {
        self.exact_groups.iter().map(|g| g.rows.len() - 1).sum()
    }
}
