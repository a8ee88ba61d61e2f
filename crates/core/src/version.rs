//! Optimistic concurrency expectations for stored collections.

/// Expected revision of a stored value when writing it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (seeding, explicit overwrite).
    Any,
    /// The key must not exist yet.
    Absent,
    /// The stored value must be at exactly this revision.
    Exact(u64),
}

impl ExpectedVersion {
    /// `current` is `None` when the key does not exist.
    pub fn matches(self, current: Option<u64>) -> bool {
        match (self, current) {
            (ExpectedVersion::Any, _) => true,
            (ExpectedVersion::Absent, None) => true,
            (ExpectedVersion::Absent, Some(_)) => false,
            (ExpectedVersion::Exact(v), Some(actual)) => v == actual,
            (ExpectedVersion::Exact(_), None) => false,
        }
    }

    /// Expectation for writing back a value read at `current`.
    pub fn from_read(current: Option<u64>) -> Self {
        match current {
            Some(v) => ExpectedVersion::Exact(v),
            None => ExpectedVersion::Absent,
        }
    }
}
