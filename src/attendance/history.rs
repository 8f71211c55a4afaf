use crate::attendance::action::LastAction;
use crate::attendance::record::StoredRecord;
use crate::store::RecordStore;
use crate::utils::time::parse_record_time;
use std::cmp::Reverse;
use std::sync::Arc;

/// What the kiosk shows for one user: the last action and a short window of
/// recent punches.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub latest: LastAction,
    pub recent: Vec<StoredRecord>,
    /// False when the store could not be read and the snapshot fell back to
    /// the empty defaults.
    pub store_reachable: bool,
}

impl HistorySnapshot {
    fn unavailable() -> Self {
        Self {
            latest: LastAction::NoHistory,
            recent: Vec::new(),
            store_reachable: false,
        }
    }
}

#[derive(Clone)]
pub struct HistoryQuery {
    store: Arc<dyn RecordStore>,
    limit: usize,
}

impl HistoryQuery {
    pub fn new(store: Arc<dyn RecordStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Last action only. Store failures read as `NoHistory`.
    pub async fn latest(&self, email: &str) -> (LastAction, bool) {
        match self.store.query_latest(email).await {
            Ok(label) => {
                let last = LastAction::from_label(label.as_deref());
                if let LastAction::Unrecognized(label) = &last {
                    tracing::warn!("Unrecognized action label {:?} for {}", label, email);
                }
                (last, true)
            }
            Err(e) => {
                tracing::warn!("Failed to read latest record for {}: {}", email, e);
                (LastAction::NoHistory, false)
            }
        }
    }

    /// Never fails; an unreachable store yields an empty snapshot.
    pub async fn snapshot(&self, email: &str) -> HistorySnapshot {
        let (latest, latest_ok) = self.latest(email).await;
        if !latest_ok {
            return HistorySnapshot::unavailable();
        }

        match self.store.query_recent(email, self.limit).await {
            Ok(mut recent) => {
                recent.retain(|record| record.email.eq_ignore_ascii_case(email));
                // Stable sort: rows with equal or unparseable times keep the
                // order the store returned them in.
                recent.sort_by_key(|record| Reverse(parse_record_time(&record.time).ok()));
                recent.truncate(self.limit);

                HistorySnapshot {
                    latest,
                    recent,
                    store_reachable: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read recent records for {}: {}", email, e);
                HistorySnapshot::unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::action::AttendanceAction;
    use crate::store::testing::RecordingStore;

    fn record(email: &str, action: &str, time: &str) -> StoredRecord {
        StoredRecord {
            email: email.to_string(),
            action: action.to_string(),
            time: time.to_string(),
            location: "1,2".to_string(),
        }
    }

    #[tokio::test]
    async fn store_failure_yields_sentinel_and_empty_list() {
        let history = HistoryQuery::new(Arc::new(RecordingStore::offline()), 5);

        let snapshot = history.snapshot("alice@decathlon.com").await;
        assert_eq!(snapshot.latest, LastAction::NoHistory);
        assert!(snapshot.recent.is_empty());
        assert!(!snapshot.store_reachable);
    }

    #[tokio::test]
    async fn snapshot_is_limited_and_filtered() {
        let store = Arc::new(RecordingStore::default());
        for hour in 10..17 {
            store
                .append(&record("alice@decathlon.com", "上班", &format!("2025-03-14 {}:00:00", hour)))
                .await
                .unwrap();
        }
        store
            .append(&record("bob@decathlon.com", "下班", "2025-03-14 18:00:00"))
            .await
            .unwrap();
        store
            .append(&record("alice@decathlon.com", "午飯開始", "2025-03-14 17:00:00"))
            .await
            .unwrap();

        let history = HistoryQuery::new(store, 5);
        let snapshot = history.snapshot("alice@decathlon.com").await;

        assert!(snapshot.store_reachable);
        assert_eq!(snapshot.latest, LastAction::Recorded(AttendanceAction::LunchStart));
        assert_eq!(snapshot.recent.len(), 5);
        assert_eq!(snapshot.recent[0].time, "2025-03-14 17:00:00");
        assert_eq!(snapshot.recent[4].time, "2025-03-14 13:00:00");
        assert!(snapshot.recent.iter().all(|r| r.email == "alice@decathlon.com"));
    }

    #[tokio::test]
    async fn unknown_label_is_reported_as_unrecognized() {
        let store = Arc::new(RecordingStore::default());
        store
            .append(&record("alice@decathlon.com", "打卡", "2025-03-14 09:00:00"))
            .await
            .unwrap();

        let history = HistoryQuery::new(store, 5);
        let (latest, reachable) = history.latest("alice@decathlon.com").await;
        assert!(reachable);
        assert_eq!(latest, LastAction::Unrecognized("打卡".to_string()));
    }
}
