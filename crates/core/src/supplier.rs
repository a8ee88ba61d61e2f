//! Supplier identity.
//!
//! Price lists arrive with free-text supplier names ("Acme Imports",
//! "ACME  imports ", "acme_imports"). Every catalog row, archive entry and
//! mapping template is keyed by the normalized slug so these all collide on
//! purpose instead of by accident.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalized supplier key: lowercase ASCII alphanumerics joined by single `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SupplierKey(String);

impl SupplierKey {
    /// Slugify a user-confirmed supplier name.
    ///
    /// Non-ASCII letters are dropped; runs of anything that is not `[a-z0-9]`
    /// collapse into one separator.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_sep = false;
        for ch in name.chars() {
            let ch = ch.to_ascii_lowercase();
            if ch.is_ascii_alphanumeric() {
                if pending_sep && !slug.is_empty() {
                    slug.push('-');
                }
                pending_sep = false;
                slug.push(ch);
            } else {
                pending_sep = true;
            }
        }

        if slug.is_empty() {
            return Err(DomainError::validation(format!(
                "supplier name {name:?} has no usable characters"
            )));
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SupplierKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SupplierKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SupplierKey> for String {
    fn from(value: SupplierKey) -> Self {
        value.0
    }
}
