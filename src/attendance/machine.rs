use crate::attendance::action::{AttendanceAction, LabelSet, LastAction};
use crate::attendance::history::HistoryQuery;
use crate::attendance::identity::SessionIdentity;
use crate::attendance::location::{self, LocationReading};
use crate::attendance::record::AttendanceRecord;
use crate::error::SubmissionError;
use crate::store::RecordStore;
use crate::utils::time::Clock;
use std::sync::Arc;

/// Next action for a user given the last label found in their history.
pub fn derive_next_action(last: &LastAction) -> AttendanceAction {
    match last {
        LastAction::Recorded(action) => action.next(),
        LastAction::NoHistory | LastAction::Unrecognized(_) => AttendanceAction::ClockIn,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextAction {
    pub action: AttendanceAction,
    pub store_reachable: bool,
}

#[derive(Clone)]
pub struct AttendanceMachine {
    store: Arc<dyn RecordStore>,
    history: HistoryQuery,
    clock: Arc<dyn Clock>,
    labels: LabelSet,
}

impl AttendanceMachine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        history: HistoryQuery,
        clock: Arc<dyn Clock>,
        labels: LabelSet,
    ) -> Self {
        Self {
            store,
            history,
            clock,
            labels,
        }
    }

    pub async fn next_action(&self, identity: &SessionIdentity) -> NextAction {
        let (last, store_reachable) = self.history.latest(identity.email()).await;
        NextAction {
            action: derive_next_action(&last),
            store_reachable,
        }
    }

    /// Records `action` for the user. Issues at most one append and never
    /// retries; a manual correction is the same call with a hand-picked
    /// action.
    pub async fn submit(
        &self,
        identity: &SessionIdentity,
        action: AttendanceAction,
        reading: Option<&LocationReading>,
    ) -> Result<AttendanceRecord, SubmissionError> {
        let location = location::resolve(reading).map_err(SubmissionError::LocationNotReady)?;

        let record = AttendanceRecord::new(identity.email(), action, self.clock.now(), location);
        let stored = record.to_stored(self.labels);

        if let Err(e) = self.store.append(&stored).await {
            tracing::error!(
                "Failed to append {} for {}: {}",
                action.as_str(),
                identity.email(),
                e
            );
            return Err(SubmissionError::StoreUnavailable(e));
        }

        tracing::info!(
            "Recorded {} for {} at {} ({})",
            record.action().as_str(),
            record.user_identifier(),
            record.timestamp().to_rfc3339(),
            record.location()
        );
        Ok(record)
    }
}
