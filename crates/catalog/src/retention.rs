//! Discontinued-archive retention.
//!
//! Reconciliation only ever adds to the archive. Whether and when an entry
//! whose references have all resolved may go away is an operator choice,
//! expressed as a [`RetentionPolicy`] and applied by an explicit prune call.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use vintrade_core::{DomainError, ProductId};

use crate::discontinued::DiscontinuedEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Never prune.
    #[default]
    KeepAll,
    /// Prune entries no longer referenced by any open order or special-order list.
    PruneResolved,
    /// Prune unreferenced entries discontinued at least `days` ago.
    PruneResolvedOlderThan { days: u32 },
}

impl FromStr for RetentionPolicy {
    type Err = DomainError;

    /// `keep-all`, `resolved`, or `resolved-after-days:<N>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "keep-all" | "" => Ok(RetentionPolicy::KeepAll),
            "resolved" => Ok(RetentionPolicy::PruneResolved),
            other => {
                let days = other
                    .strip_prefix("resolved-after-days:")
                    .and_then(|d| d.parse::<u32>().ok())
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            "unknown retention policy {other:?} (expected keep-all, resolved, resolved-after-days:N)"
                        ))
                    })?;
                Ok(RetentionPolicy::PruneResolvedOlderThan { days })
            }
        }
    }
}

/// Result of a prune pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Pruned {
    pub kept: Vec<DiscontinuedEntry>,
    pub pruned: Vec<ProductId>,
}

/// Apply `policy` to the archive. Live-referenced entries are always kept.
pub fn prune_discontinued(
    archive: Vec<DiscontinuedEntry>,
    live_ids: &HashSet<ProductId>,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
) -> Pruned {
    let min_age = match policy {
        RetentionPolicy::KeepAll => {
            return Pruned {
                kept: archive,
                pruned: Vec::new(),
            };
        }
        RetentionPolicy::PruneResolved => Duration::zero(),
        RetentionPolicy::PruneResolvedOlderThan { days } => Duration::days(i64::from(days)),
    };

    let (pruned, kept): (Vec<DiscontinuedEntry>, Vec<DiscontinuedEntry>) =
        archive.into_iter().partition(|entry| {
            !live_ids.contains(&entry.id()) && now - entry.discontinued_at >= min_age
        });

    Pruned {
        kept,
        pruned: pruned.iter().map(DiscontinuedEntry::id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::product;
    use vintrade_core::SupplierKey;

    fn entry(age_days: i64, now: DateTime<Utc>) -> DiscontinuedEntry {
        DiscontinuedEntry::new(
            product("acme", "old"),
            now - Duration::days(age_days),
            SupplierKey::new("acme").unwrap(),
        )
    }

    #[test]
    fn keep_all_is_the_default_and_prunes_nothing() {
        let now = Utc::now();
        let archive = vec![entry(400, now)];
        let r = prune_discontinued(archive.clone(), &HashSet::new(), RetentionPolicy::default(), now);
        assert_eq!(r.kept, archive);
        assert!(r.pruned.is_empty());
    }

    #[test]
    fn resolved_entries_go_and_live_entries_stay() {
        let now = Utc::now();
        let live = entry(1, now);
        let resolved = entry(1, now);
        let r = prune_discontinued(
            vec![live.clone(), resolved.clone()],
            &HashSet::from([live.id()]),
            RetentionPolicy::PruneResolved,
            now,
        );
        assert_eq!(r.kept, vec![live]);
        assert_eq!(r.pruned, vec![resolved.id()]);
    }

    #[test]
    fn age_threshold_is_respected() {
        let now = Utc::now();
        let young = entry(5, now);
        let old = entry(45, now);
        let r = prune_discontinued(
            vec![young.clone(), old.clone()],
            &HashSet::new(),
            RetentionPolicy::PruneResolvedOlderThan { days: 30 },
            now,
        );
        assert_eq!(r.kept, vec![young]);
        assert_eq!(r.pruned, vec![old.id()]);
    }

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!("keep-all".parse::<RetentionPolicy>().unwrap(), RetentionPolicy::KeepAll);
        assert_eq!("Resolved".parse::<RetentionPolicy>().unwrap(), RetentionPolicy::PruneResolved);
        assert_eq!(
            "resolved-after-days:90".parse::<RetentionPolicy>().unwrap(),
            RetentionPolicy::PruneResolvedOlderThan { days: 90 }
        );
        assert!("forever".parse::<RetentionPolicy>().is_err());
    }
}
