//! Remote presence reconciler: folds the event stream into the latest
//! record per remote user.

use std::collections::HashMap;

use super::types::PresenceRecord;

/// Upsert-by-`user_id`, last-write-wins. Records are replaced wholesale,
/// never merged field-by-field. The reconciler only removes a record when
/// told the user departed; it never ages anything out on its own.
#[derive(Debug, Default)]
pub struct PresenceReconciler {
    records: HashMap<String, PresenceRecord>,
}

impl PresenceReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record. Returns false if it was rejected as stale.
    ///
    /// A record is stale when its `seq` is lower than the stored one for
    /// the same user. Ties apply: senders that never tag their updates all
    /// carry `seq == 0`, and for them arrival order decides, as in plain
    /// last-write-wins.
    pub fn apply(&mut self, record: PresenceRecord) -> bool {
        if let Some(existing) = self.records.get(&record.user_id) {
            if record.seq < existing.seq {
                tracing::debug!(
                    user = %record.user_id,
                    stale = record.seq,
                    current = existing.seq,
                    "Rejecting out-of-order presence update"
                );
                return false;
            }
        }
        self.records.insert(record.user_id.clone(), record);
        true
    }

    /// Drop a user's record. Returns true if one was present.
    pub fn remove(&mut self, user_id: &str) -> bool {
        self.records.remove(user_id).is_some()
    }

    /// Latest record for one user.
    pub fn get(&self, user_id: &str) -> Option<&PresenceRecord> {
        self.records.get(user_id)
    }

    /// Render-ready list of every known remote user, recomputed fresh from
    /// the map on each call.
    pub fn snapshot(&self) -> Vec<PresenceRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str, chat_text: &str, seq: u64) -> PresenceRecord {
        PresenceRecord {
            user_id: user_id.into(),
            username: format!("User-{user_id}"),
            x: 0,
            y: 0,
            chat_text: chat_text.into(),
            seq,
        }
    }

    #[test]
    fn repeated_updates_keep_exactly_one_record_per_user() {
        let mut reconciler = PresenceReconciler::new();
        reconciler.apply(record("a1", "h", 1));
        reconciler.apply(record("a1", "hi", 2));

        assert_eq!(reconciler.len(), 1);
        assert_eq!(reconciler.get("a1").unwrap().chat_text, "hi");
    }

    #[test]
    fn final_state_equals_last_update_in_sequence() {
        let mut reconciler = PresenceReconciler::new();
        let last = PresenceRecord {
            user_id: "a1".into(),
            username: "User-Fox".into(),
            x: 42,
            y: 17,
            chat_text: "done".into(),
            seq: 5,
        };
        for (i, text) in ["a", "ab", "abc", "done"].iter().enumerate() {
            reconciler.apply(PresenceRecord {
                chat_text: text.to_string(),
                x: 42,
                y: 17,
                seq: i as u64 + 2,
                ..last.clone()
            });
        }

        assert_eq!(reconciler.snapshot(), vec![last]);
    }

    #[test]
    fn interleaving_across_users_is_order_independent() {
        let u1 = [record("u1", "a", 1), record("u1", "b", 2)];
        let u2 = [record("u2", "x", 1), record("u2", "y", 2)];

        // Interleaved one way.
        let mut left = PresenceReconciler::new();
        left.apply(u1[0].clone());
        left.apply(u2[0].clone());
        left.apply(u1[1].clone());
        left.apply(u2[1].clone());

        // Each user's subsequence processed on its own.
        let mut right = PresenceReconciler::new();
        right.apply(u2[0].clone());
        right.apply(u2[1].clone());
        right.apply(u1[0].clone());
        right.apply(u1[1].clone());

        assert_eq!(left.get("u1"), right.get("u1"));
        assert_eq!(left.get("u2"), right.get("u2"));
        assert_eq!(left.len(), right.len());
    }

    #[test]
    fn stale_sequence_numbers_are_rejected() {
        let mut reconciler = PresenceReconciler::new();
        assert!(reconciler.apply(record("a1", "new", 5)));
        assert!(!reconciler.apply(record("a1", "old", 3)));
        assert_eq!(reconciler.get("a1").unwrap().chat_text, "new");
    }

    #[test]
    fn untagged_updates_fall_back_to_arrival_order() {
        let mut reconciler = PresenceReconciler::new();
        assert!(reconciler.apply(record("a1", "first", 0)));
        assert!(reconciler.apply(record("a1", "second", 0)));
        assert_eq!(reconciler.get("a1").unwrap().chat_text, "second");
    }

    #[test]
    fn remove_drops_only_the_named_user() {
        let mut reconciler = PresenceReconciler::new();
        reconciler.apply(record("a1", "", 1));
        reconciler.apply(record("b1", "", 1));

        assert!(reconciler.remove("a1"));
        assert!(!reconciler.remove("a1"));
        assert_eq!(reconciler.len(), 1);
        assert!(reconciler.get("b1").is_some());
    }

    #[test]
    fn unknown_and_known_users_upsert_identically() {
        let mut reconciler = PresenceReconciler::new();
        // First event for an unknown user creates the record implicitly.
        assert!(reconciler.apply(record("a1", "hello", 1)));
        assert_eq!(reconciler.len(), 1);
        // A later event for the now-known user replaces it the same way.
        assert!(reconciler.apply(record("a1", "again", 2)));
        assert_eq!(reconciler.len(), 1);
    }

    #[test]
    fn snapshot_is_recomputed_fresh() {
        let mut reconciler = PresenceReconciler::new();
        reconciler.apply(record("a1", "", 1));
        let before = reconciler.snapshot();

        reconciler.apply(record("b1", "", 1));
        let after = reconciler.snapshot();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }
}
