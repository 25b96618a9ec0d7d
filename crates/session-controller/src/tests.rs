use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use recent_symbols::RecentSymbols;
use session_core::{
    AnalysisBackend, AnalysisReply, InstrumentSeries, Role, Signal, SignalFrame, Timeframe,
    WorkbenchError,
};
use tokio::sync::Notify;

use super::*;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn sample_series(symbol: &str) -> InstrumentSeries {
    InstrumentSeries::new(
        symbol,
        vec![100.0, 101.0, 103.0, 102.0, 105.0],
        vec![
            date("2024-01-02"),
            date("2024-01-03"),
            date("2024-01-04"),
            date("2024-01-05"),
            date("2024-01-08"),
        ],
        vec![100.0, 100.5, 101.3, 101.5, 102.2],
        vec![99.0, 99.5, 100.0, 100.2, 100.9],
        vec![
            Signal::Hold,
            Signal::Buy,
            Signal::Hold,
            Signal::Sell,
            Signal::Buy,
        ],
    )
    .unwrap()
}

/// Programmable in-memory backend. `gate_symbol` makes the matching fetch
/// wait until released, for interleaving tests.
struct MockBackend {
    fail_fetch: AtomicBool,
    fail_analysis: AtomicBool,
    fail_chat: AtomicBool,
    fetch_calls: StdMutex<Vec<String>>,
    analysis_calls: StdMutex<Vec<String>>,
    gate_symbol: Option<String>,
    entered: Notify,
    release: Notify,
}

impl MockBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_fetch: AtomicBool::new(false),
            fail_analysis: AtomicBool::new(false),
            fail_chat: AtomicBool::new(false),
            fetch_calls: StdMutex::new(Vec::new()),
            analysis_calls: StdMutex::new(Vec::new()),
            gate_symbol: None,
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    fn gated(symbol: &str) -> Arc<Self> {
        let mut backend = Self::new();
        Arc::get_mut(&mut backend).unwrap().gate_symbol = Some(symbol.to_string());
        backend
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn fetch_instrument_data(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
    ) -> Result<InstrumentSeries, WorkbenchError> {
        self.fetch_calls.lock().unwrap().push(symbol.to_string());
        if self.gate_symbol.as_deref() == Some(symbol) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Fetch("connection refused".into()));
        }
        Ok(sample_series(symbol))
    }

    async fn request_analysis(
        &self,
        symbol: &str,
        _signals: &SignalFrame,
    ) -> Result<AnalysisReply, WorkbenchError> {
        self.analysis_calls.lock().unwrap().push(symbol.to_string());
        if self.fail_analysis.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Analysis("model unavailable".into()));
        }
        Ok(AnalysisReply {
            narrative: format!("Outlook for {}", symbol),
            session_id: format!("session-{}", symbol),
        })
    }

    async fn send_chat_message(
        &self,
        _session_id: &str,
        message: &str,
    ) -> Result<String, WorkbenchError> {
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Chat("model overloaded".into()));
        }
        Ok(format!("reply to: {}", message))
    }

    async fn clear_session(&self, _session_id: &str) -> Result<(), WorkbenchError> {
        Ok(())
    }

    async fn reset_model(&self) -> Result<(), WorkbenchError> {
        Ok(())
    }
}

fn controller_with(backend: Arc<MockBackend>) -> (tempfile::TempDir, SessionController) {
    let dir = tempfile::tempdir().unwrap();
    let recent = RecentSymbols::open(dir.path().join("recent.json"));
    (dir, SessionController::new(backend, recent))
}

#[tokio::test]
async fn test_happy_path_opens_seeded_session() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend);

    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.phase, Phase::Ready);
    assert!(state.last_error.is_none());
    assert!(state.stats.is_some());

    let session = state.session.unwrap();
    assert_eq!(session.symbol, "NVDA");
    assert_eq!(session.session_id, "session-NVDA");
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].role, Role::System);
    assert_eq!(session.messages[0].content, "Outlook for NVDA");

    assert_eq!(controller.recent_symbols().await, ["NVDA"]);
}

#[tokio::test]
async fn test_symbol_is_normalized_before_remote_calls() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());

    controller
        .request_analysis("nvda", Timeframe::Month3)
        .await
        .unwrap();

    assert_eq!(*backend.fetch_calls.lock().unwrap(), ["NVDA"]);
    assert_eq!(*backend.analysis_calls.lock().unwrap(), ["NVDA"]);
    assert_eq!(
        controller.snapshot().await.session.unwrap().symbol,
        "NVDA"
    );
}

#[tokio::test]
async fn test_empty_symbol_is_rejected_without_transition() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());

    let result = controller.request_analysis("   ", Timeframe::Month3).await;

    assert!(result.is_err());
    assert_eq!(controller.snapshot().await.phase, Phase::Idle);
    assert!(backend.fetch_calls.lock().unwrap().is_empty());
    assert!(!controller.take_notices().await.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_preserves_displayed_state() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());

    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();
    let before = controller.snapshot().await;

    backend.fail_fetch.store(true, Ordering::SeqCst);
    let result = controller.request_analysis("AAPL", Timeframe::Month3).await;
    assert!(matches!(result, Err(WorkbenchError::Fetch(_))));

    let after = controller.snapshot().await;
    assert_eq!(after.phase, Phase::Failed);
    assert!(after.last_error.is_some());
    // The previously displayed session and stats survive the failure.
    assert_eq!(
        after.session.as_ref().unwrap().session_id,
        before.session.as_ref().unwrap().session_id
    );
    assert_eq!(
        after.stats.unwrap().trade_count,
        before.stats.unwrap().trade_count
    );

    let notices = controller.take_notices().await;
    assert!(notices.iter().any(|n| n.title == "Failed to fetch data"));
}

#[tokio::test]
async fn test_analysis_failure_preserves_displayed_state() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());

    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();

    backend.fail_analysis.store(true, Ordering::SeqCst);
    let result = controller.request_analysis("TSLA", Timeframe::Month3).await;
    assert!(matches!(result, Err(WorkbenchError::Analysis(_))));

    let after = controller.snapshot().await;
    assert_eq!(after.phase, Phase::Failed);
    assert_eq!(after.session.unwrap().symbol, "NVDA");
    // The failed attempt never becomes a recent symbol.
    assert_eq!(controller.recent_symbols().await, ["NVDA"]);
}

#[tokio::test]
async fn test_chat_appends_user_then_assistant() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend);
    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();

    let reply = controller.send_message("hi").await;
    assert_eq!(reply.as_deref(), Some("reply to: hi"));

    let messages = controller.snapshot().await.session.unwrap().messages;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hi");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "reply to: hi");
}

#[tokio::test]
async fn test_chat_failure_appends_fallback_and_keeps_user_message() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());
    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();

    backend.fail_chat.store(true, Ordering::SeqCst);
    let reply = controller.send_message("hi").await;
    assert!(reply.is_none());

    let messages = controller.snapshot().await.session.unwrap().messages;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hi");
    assert_eq!(messages[2].role, Role::System);
    assert_eq!(messages[2].content, CHAT_FALLBACK);

    let notices = controller.take_notices().await;
    assert!(notices.iter().any(|n| n.title == "Message failed"));
}

#[tokio::test]
async fn test_send_message_without_session_is_silent_noop() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend);

    assert!(controller.send_message("hello?").await.is_none());
    let state = controller.snapshot().await;
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.session.is_none());
}

#[tokio::test]
async fn test_superseded_request_is_discarded() {
    let backend = MockBackend::gated("SLOW");
    let (_dir, controller) = controller_with(backend.clone());
    let controller = Arc::new(controller);

    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.request_analysis("SLOW", Timeframe::Month3).await })
    };
    backend.entered.notified().await;

    // A second request supersedes the in-flight one...
    controller
        .request_analysis("FAST", Timeframe::Month3)
        .await
        .unwrap();

    // ...so when the first finally completes, its result is dropped.
    backend.release.notify_one();
    slow.await.unwrap().unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.session.unwrap().symbol, "FAST");
    assert_eq!(controller.recent_symbols().await, ["FAST"]);
}

#[tokio::test]
async fn test_series_cache_avoids_refetch() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend.clone());

    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();
    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();

    assert_eq!(backend.fetch_calls.lock().unwrap().len(), 1);
    // Each request still produces a fresh narrative and session.
    assert_eq!(backend.analysis_calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recent_symbols_track_mru_order() {
    let backend = MockBackend::new();
    let (_dir, controller) = controller_with(backend);

    controller
        .request_analysis("NVDA", Timeframe::Month3)
        .await
        .unwrap();
    controller
        .request_analysis("AAPL", Timeframe::Month3)
        .await
        .unwrap();
    controller
        .request_analysis("NVDA", Timeframe::Month1)
        .await
        .unwrap();

    assert_eq!(controller.recent_symbols().await, ["NVDA", "AAPL"]);
}
