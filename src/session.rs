//! Mount lifecycle of one dashboard view.
//!
//! A [`Session`] is created on mount. It spawns the settle-all fetch, and
//! the result is delivered at most once through a oneshot channel. Each
//! session carries a [`LivenessToken`]; unmounting revokes it, and a fetch
//! that settles afterwards is discarded instead of being applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::{AbortHandle, JoinError, JoinHandle};

use crate::data::DashboardData;
use crate::fetch::fetch_all;
use crate::source::AnalyticsSource;

/// Message recorded when the aggregation step itself fails.
pub const GENERIC_LOAD_ERROR: &str = "Failed to load dashboard data";

/// Shared flag tying asynchronous work to a view's lifetime.
#[derive(Debug, Clone)]
pub struct LivenessToken(Arc<AtomicBool>);

impl LivenessToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the owner as gone. Irreversible.
    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one mount's load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Requests settled and were merged (individual slots may have failed).
    Loaded(DashboardData),
    /// The aggregation step itself failed.
    Failed(String),
}

impl LoadOutcome {
    /// The snapshot to render; a failed load becomes the all-default state.
    pub fn into_data(self, report_date: &str) -> DashboardData {
        match self {
            LoadOutcome::Loaded(data) => data,
            LoadOutcome::Failed(message) => DashboardData::failed_load(report_date, message),
        }
    }
}

/// Run the fetch and merge on its own task so a panic stays contained.
fn spawn_aggregation(
    source: Arc<dyn AnalyticsSource>,
    prefix: &str,
    report_date: &str,
) -> JoinHandle<DashboardData> {
    let prefix = prefix.to_string();
    let date = report_date.to_string();

    tokio::spawn(async move {
        let settled = fetch_all(source.as_ref(), &prefix, &date).await;
        DashboardData::merge(date, settled)
    })
}

fn outcome_of(joined: Result<DashboardData, JoinError>) -> LoadOutcome {
    match joined {
        Ok(data) => LoadOutcome::Loaded(data),
        Err(e) if e.is_cancelled() => LoadOutcome::Failed(GENERIC_LOAD_ERROR.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Dashboard aggregation failed");
            LoadOutcome::Failed(GENERIC_LOAD_ERROR.to_string())
        }
    }
}

/// Load once, outside any view.
///
/// Shares the failure handling of [`Session::mount`]: a panic while
/// fetching or merging yields [`LoadOutcome::Failed`].
pub async fn load(source: Arc<dyn AnalyticsSource>, prefix: &str, report_date: &str) -> LoadOutcome {
    outcome_of(spawn_aggregation(source, prefix, report_date).await)
}

/// One mounted dashboard view.
#[derive(Debug)]
pub struct Session {
    token: LivenessToken,
    receiver: Option<oneshot::Receiver<LoadOutcome>>,
    aggregation: AbortHandle,
    report_date: String,
}

impl Session {
    /// Mount: fire the four requests in the background.
    ///
    /// Must be called within a tokio runtime.
    pub fn mount(source: Arc<dyn AnalyticsSource>, prefix: &str, report_date: &str) -> Self {
        let token = LivenessToken::new();
        let (tx, rx) = oneshot::channel();

        tracing::info!(source = source.description(), date = report_date, "Mounting dashboard");

        let aggregation = spawn_aggregation(source, prefix, report_date);
        let abort = aggregation.abort_handle();

        let task_token = token.clone();
        tokio::spawn(async move {
            let outcome = outcome_of(aggregation.await);

            if task_token.is_alive() {
                let _ = tx.send(outcome);
            } else {
                tracing::debug!("Discarding load result for unmounted view");
            }
        });

        Self {
            token,
            receiver: Some(rx),
            aggregation: abort,
            report_date: report_date.to_string(),
        }
    }

    /// Take the load result if it has arrived.
    ///
    /// Non-blocking. Returns `Some` at most once per session, and never
    /// after [`Session::unmount`].
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        if !self.token.is_alive() {
            return None;
        }

        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.receiver = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.receiver = None;
                Some(LoadOutcome::Failed(GENERIC_LOAD_ERROR.to_string()))
            }
        }
    }

    /// Tear down: cancel in-flight requests and drop late results.
    pub fn unmount(&mut self) {
        self.token.revoke();
        self.aggregation.abort();
        self.receiver = None;
    }

    /// Whether the load is still in flight.
    pub fn is_pending(&self) -> bool {
        self.token.is_alive() && self.receiver.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.token.is_alive()
    }

    /// The date this mount requested.
    pub fn report_date(&self) -> &str {
        &self.report_date
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.token.revoke();
        self.aggregation.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::{PanickingSource, StubSource};
    use crate::source::DEFAULT_PREFIX;
    use std::time::Duration;

    async fn wait_for(session: &mut Session) -> Option<LoadOutcome> {
        for _ in 0..100 {
            if let Some(outcome) = session.poll() {
                return Some(outcome);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[test]
    fn test_token_revoke_is_shared() {
        let token = LivenessToken::new();
        let clone = token.clone();
        assert!(clone.is_alive());
        token.revoke();
        assert!(!clone.is_alive());
    }

    #[tokio::test]
    async fn test_session_delivers_once() {
        let source = Arc::new(StubSource::healthy());
        let mut session = Session::mount(source, DEFAULT_PREFIX, "2024-02-29");
        assert!(session.is_pending());

        match wait_for(&mut session).await {
            Some(LoadOutcome::Loaded(data)) => {
                assert_eq!(data.report_date, "2024-02-29");
                assert_eq!(data.live_visits, 12);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert!(!session.is_pending());
        assert!(session.poll().is_none());
    }

    #[tokio::test]
    async fn test_unmount_discards_late_result() {
        let source = Arc::new(StubSource::healthy().with_delay(Duration::from_millis(50)));
        let mut session = Session::mount(source, DEFAULT_PREFIX, "2024-02-29");

        session.unmount();
        assert!(!session.is_mounted());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(session.poll().is_none());
    }

    #[tokio::test]
    async fn test_aggregation_panic_becomes_generic_error() {
        let mut session = Session::mount(Arc::new(PanickingSource), DEFAULT_PREFIX, "2024-02-29");

        match wait_for(&mut session).await {
            Some(LoadOutcome::Failed(message)) => assert_eq!(message, GENERIC_LOAD_ERROR),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unmount_cancels_in_flight_requests() {
        let source = Arc::new(StubSource::healthy().with_delay(Duration::from_millis(100)));
        let mut session = Session::mount(source.clone(), DEFAULT_PREFIX, "2024-02-29");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.calls(), 4);

        session.unmount();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(source.finished(), 0);
    }

    #[tokio::test]
    async fn test_load_contains_aggregation_panic() {
        let outcome = load(Arc::new(PanickingSource), DEFAULT_PREFIX, "2024-02-29").await;
        assert!(matches!(outcome, LoadOutcome::Failed(ref m) if m == GENERIC_LOAD_ERROR));

        let data = outcome.into_data("2024-02-29");
        assert_eq!(data.report_date, "2024-02-29");
        assert_eq!(data.load_error.as_deref(), Some(GENERIC_LOAD_ERROR));
        assert_eq!(data.live_visits, 0);
    }

    #[tokio::test]
    async fn test_load_healthy() {
        let outcome = load(Arc::new(StubSource::healthy()), DEFAULT_PREFIX, "2024-02-29").await;
        let data = outcome.into_data("ignored");
        assert_eq!(data.report_date, "2024-02-29");
        assert_eq!(data.total_visits, 340);
        assert!(data.load_error.is_none());
    }
}
