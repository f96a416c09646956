//! Basis comparison between a local revision log and the remote's.
//!
//! ```text
//! remote empty                          → incomparable
//! local empty                           → stale
//! local contains remote.latest()        → up_to_date
//! otherwise                             → stale
//! ```
//!
//! "Contains" means any local record matches the remote's latest record on
//! author, timestamp and description. This does not walk history: a remote
//! that advanced by several revisions is only detected through its newest
//! record.

use serde::Serialize;

use crate::revision::RevisionLog;

/// Result of comparing a local revision log against the remote's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BasisOutcome {
    /// The local log contains the remote's latest revision.
    UpToDate,
    /// The local edit is not based on the remote's latest revision.
    Stale { reason: String },
    /// The remote side cannot serve as a basis.
    Incomparable { reason: String },
}

impl BasisOutcome {
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

/// Decide whether `local` is based on the latest revision of `remote`.
#[must_use]
pub fn compare(local: &RevisionLog, remote: &RevisionLog) -> BasisOutcome {
    let Some(remote_latest) = remote.latest() else {
        return BasisOutcome::Incomparable {
            reason: "remote has no revision history".to_string(),
        };
    };

    if local.is_empty() {
        return BasisOutcome::Stale {
            reason: "local has no revision history".to_string(),
        };
    }

    if local.contains_revision(remote_latest) {
        BasisOutcome::UpToDate
    } else {
        BasisOutcome::Stale {
            reason: format!(
                "local is missing remote's latest revision record: {} - {}",
                remote_latest.author, remote_latest.timestamp
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::revision::RevisionRecord;

    fn log(rows: &[(&str, &str, &str, &str)]) -> RevisionLog {
        rows.iter()
            .map(|(a, t, d, v)| RevisionRecord::new(*a, *t, *d, *v))
            .collect()
    }

    #[test]
    fn identical_logs_are_up_to_date() {
        let local = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v2")]);
        assert_eq!(compare(&local, &local.clone()), BasisOutcome::UpToDate);
    }

    #[test]
    fn missing_remote_tail_is_stale_and_names_it() {
        let local = log(&[("A", "t1", "c1", "v1")]);
        let remote = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v2")]);

        let outcome = compare(&local, &remote);
        let BasisOutcome::Stale { reason } = outcome else {
            panic!("expected stale, got {outcome:?}");
        };
        assert!(reason.contains("B - t2"), "reason was: {reason}");
    }

    #[test]
    fn version_label_mismatch_is_ignored() {
        let local = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v9")]);
        let remote = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v2")]);
        assert_eq!(compare(&local, &remote), BasisOutcome::UpToDate);
    }

    #[test]
    fn empty_remote_is_incomparable() {
        let local = log(&[("A", "t1", "c1", "v1")]);
        assert_eq!(
            compare(&local, &RevisionLog::default()),
            BasisOutcome::Incomparable {
                reason: "remote has no revision history".to_string()
            }
        );
    }

    #[test]
    fn empty_remote_wins_over_empty_local() {
        let outcome = compare(&RevisionLog::default(), &RevisionLog::default());
        assert!(matches!(outcome, BasisOutcome::Incomparable { .. }));
    }

    #[test]
    fn empty_local_is_stale() {
        let remote = log(&[("A", "t1", "c1", "v1")]);
        assert_eq!(
            compare(&RevisionLog::default(), &remote),
            BasisOutcome::Stale {
                reason: "local has no revision history".to_string()
            }
        );
    }

    #[test]
    fn remote_latest_may_appear_anywhere_in_local() {
        let local = log(&[
            ("B", "t2", "c2", "v2"),
            ("A", "t1", "c1", "v1"),
            ("C", "t3", "c3", "v3"),
        ]);
        let remote = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v2")]);
        assert!(compare(&local, &remote).is_up_to_date());
    }

    #[rstest]
    #[case::author(("X", "t2", "c2", "v2"))]
    #[case::timestamp(("B", "t9", "c2", "v2"))]
    #[case::description(("B", "t2", "other", "v2"))]
    fn any_matched_field_difference_is_stale(#[case] local_tail: (&str, &str, &str, &str)) {
        let local = log(&[("A", "t1", "c1", "v1"), local_tail]);
        let remote = log(&[("A", "t1", "c1", "v1"), ("B", "t2", "c2", "v2")]);
        assert!(matches!(
            compare(&local, &remote),
            BasisOutcome::Stale { .. }
        ));
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let value = serde_json::to_value(BasisOutcome::Stale {
            reason: "r".to_string(),
        })
        .expect("serialize outcome");
        assert_eq!(value["outcome"], "stale");
        assert_eq!(value["reason"], "r");
    }
}
