//! Revision records and the ordered revision log of a single workbook.

use serde::{Deserialize, Serialize};

/// One row of a revision log sheet.
///
/// All fields are free-form text taken verbatim from the sheet. No temporal or
/// numeric parsing is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub author: String,
    pub timestamp: String,
    pub description: String,
    pub version_label: String,
}

impl RevisionRecord {
    #[must_use]
    pub fn new(
        author: impl Into<String>,
        timestamp: impl Into<String>,
        description: impl Into<String>,
        version_label: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            timestamp: timestamp.into(),
            description: description.into(),
            version_label: version_label.into(),
        }
    }

    /// Build a record from positional cell texts.
    ///
    /// Column 1 is the author, 2 the timestamp, 3 the description and 4 the
    /// version label. Missing trailing cells become empty strings; extra cells
    /// are ignored.
    #[must_use]
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            author: next(),
            timestamp: next(),
            description: next(),
            version_label: next(),
        }
    }

    /// Whether `other` describes the same revision.
    ///
    /// Author, timestamp and description must match exactly. The version
    /// label is not compared: a local copy may number its revisions
    /// differently from the remote.
    #[must_use]
    pub fn same_revision(&self, other: &Self) -> bool {
        self.author == other.author
            && self.timestamp == other.timestamp
            && self.description == other.description
    }
}

/// Ordered revision records of one workbook, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionLog {
    records: Vec<RevisionRecord>,
}

impl RevisionLog {
    #[must_use]
    pub const fn new(records: Vec<RevisionRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[RevisionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record (last by sheet row order).
    #[must_use]
    pub fn latest(&self) -> Option<&RevisionRecord> {
        self.records.last()
    }

    /// Whether any record in this log is the same revision as `record`.
    #[must_use]
    pub fn contains_revision(&self, record: &RevisionRecord) -> bool {
        self.records.iter().any(|own| own.same_revision(record))
    }
}

impl From<Vec<RevisionRecord>> for RevisionLog {
    fn from(records: Vec<RevisionRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<RevisionRecord> for RevisionLog {
    fn from_iter<T: IntoIterator<Item = RevisionRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RevisionLog {
    type Item = &'a RevisionRecord;
    type IntoIter = std::slice::Iter<'a, RevisionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
