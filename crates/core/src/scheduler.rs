//! Priority ordering of open cases.
//!
//! The ordered view is derived from the store on every call. Nothing is cached, so the
//! view can never be stale with respect to the store.

use crate::cases::EmergencyCase;
use std::cmp::Ordering;

/// Ordering used for the active-case view: ascending effective priority, then newest
/// first.
pub fn compare_urgency(a: &EmergencyCase, b: &EmergencyCase) -> Ordering {
    a.effective_priority()
        .cmp(&b.effective_priority())
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Cases that are not resolved, most urgent first.
///
/// Cases missing a priority sort as [`crate::constants::DEFAULT_PRIORITY`]. The sort is
/// stable, so cases equal on both keys keep their store order.
pub fn active_emergencies(cases: &[EmergencyCase]) -> Vec<&EmergencyCase> {
    let mut active: Vec<&EmergencyCase> = cases.iter().filter(|c| !c.is_resolved()).collect();
    active.sort_by(|a, b| compare_urgency(a, b));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{CaseStatus, CaseStore, NewCase};
    use crate::constants::DEFAULT_PRIORITY;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    #[test]
    fn test_orders_by_priority_then_newest() {
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let mut store = CaseStore::new();
        store
            .create(Some(NewCase::new("C", "p2").with_priority(2).with_timestamp(base)))
            .unwrap();
        store
            .create(Some(
                NewCase::new("A", "p1-newest")
                    .with_priority(1)
                    .with_timestamp(base + Duration::minutes(10)),
            ))
            .unwrap();
        store
            .create(Some(
                NewCase::new("B", "p1-older")
                    .with_priority(1)
                    .with_timestamp(base + Duration::minutes(5)),
            ))
            .unwrap();

        let order: Vec<&str> = active_emergencies(store.cases())
            .iter()
            .map(|c| c.condition.as_str())
            .collect();
        assert_eq!(order, vec!["p1-newest", "p1-older", "p2"]);
    }

    #[test]
    fn test_missing_priority_sorts_last() {
        let mut store = CaseStore::new();
        store.create(Some(NewCase::new("A", "none"))).unwrap();
        store
            .create(Some(NewCase::new("B", "low").with_priority(500)))
            .unwrap();

        let active = active_emergencies(store.cases());
        assert_eq!(active[0].condition, "low");
        assert_eq!(active[1].effective_priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn test_excludes_resolved_and_leaves_store_untouched() {
        let mut store = CaseStore::new();
        let id = store
            .create(Some(NewCase::new("A", "done").with_priority(1)))
            .unwrap()
            .case_id
            .clone();
        store.create(Some(NewCase::new("B", "open"))).unwrap();
        store
            .update_status(id.as_str(), CaseStatus::Resolved, None)
            .unwrap();

        let before = store.cases().to_vec();
        let active = active_emergencies(store.cases());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].condition, "open");
        assert_eq!(store.cases(), before.as_slice());
    }

    #[test]
    fn test_empty_store() {
        assert!(active_emergencies(&[]).is_empty());
    }

    fn status_strategy() -> impl Strategy<Value = CaseStatus> {
        prop_oneof![
            Just(CaseStatus::Active),
            Just(CaseStatus::Responded),
            Just(CaseStatus::Resolved),
        ]
    }

    proptest! {
        #[test]
        fn prop_active_view_is_sorted_and_unresolved(
            specs in proptest::collection::vec(
                (proptest::option::of(0u32..5), 0i64..20, status_strategy()),
                0..40,
            )
        ) {
            let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let mut store = CaseStore::new();
            for (priority, minutes, status) in &specs {
                let mut data = NewCase::new("P", "c")
                    .with_timestamp(base + Duration::minutes(*minutes))
                    .with_status(*status);
                data.priority = *priority;
                store.create(Some(data)).unwrap();
            }

            let active = active_emergencies(store.cases());
            let expected = specs.iter().filter(|(_, _, s)| *s != CaseStatus::Resolved).count();
            prop_assert_eq!(active.len(), expected);

            for c in &active {
                prop_assert!(c.status != CaseStatus::Resolved);
            }
            for pair in active.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(
                    a.effective_priority() < b.effective_priority()
                        || (a.effective_priority() == b.effective_priority()
                            && a.timestamp >= b.timestamp)
                );
            }
        }
    }
}
