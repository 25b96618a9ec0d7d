//! Analysis session orchestration.
//!
//! Sequences the data-fetch → analyze → chat workflow behind a single
//! state holder. UI layers call the async methods, render [`ViewState`]
//! snapshots and drain transient [`Notice`]s; they never observe partial
//! transitions.

pub mod state;

#[cfg(test)]
mod tests;

pub use state::{Notice, Phase, ViewState};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use recent_symbols::RecentSymbols;
use session_core::{
    AnalysisBackend, AnalysisSession, ChatMessage, InstrumentSeries, Timeframe, WorkbenchError,
};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Appended in place of an assistant reply when a chat exchange fails.
pub const CHAT_FALLBACK: &str = "Sorry, I couldn't process that message. Please try again.";

const CACHE_TTL_SECS: u64 = 300; // 5 minutes

struct CacheEntry {
    series: InstrumentSeries,
    cached_at: Instant,
}

/// Owns the analysis lifecycle for one UI surface.
///
/// All methods take `&self`; the controller is shared behind an `Arc` and
/// the state lock is held only across synchronous transitions, never
/// across a remote call.
pub struct SessionController {
    backend: Arc<dyn AnalysisBackend>,
    state: RwLock<ViewState>,
    notices: Mutex<VecDeque<Notice>>,
    /// Monotonic analysis-request counter; completions whose generation no
    /// longer matches are discarded instead of overwriting newer state.
    generation: AtomicU64,
    recent: Mutex<RecentSymbols>,
    series_cache: DashMap<String, CacheEntry>,
}

impl SessionController {
    pub fn new(backend: Arc<dyn AnalysisBackend>, recent: RecentSymbols) -> Self {
        Self {
            backend,
            state: RwLock::new(ViewState::default()),
            notices: Mutex::new(VecDeque::new()),
            generation: AtomicU64::new(0),
            recent: Mutex::new(recent),
            series_cache: DashMap::new(),
        }
    }

    /// Current renderable state.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Drain pending transient notifications.
    pub async fn take_notices(&self) -> Vec<Notice> {
        self.notices.lock().await.drain(..).collect()
    }

    /// Recently analyzed symbols, most recent first.
    pub async fn recent_symbols(&self) -> Vec<String> {
        self.recent.lock().await.list().to_vec()
    }

    /// Run the full fetch → analyze workflow and open a fresh session.
    ///
    /// The symbol is uppercased before any remote call. On success the
    /// previous session is discarded and the new one starts with the
    /// narrative as its single system message. On failure the previously
    /// displayed session survives untouched and a notice is emitted.
    pub async fn request_analysis(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<(), WorkbenchError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            self.push_notice("Invalid symbol", "Please enter an instrument symbol.")
                .await;
            return Err(WorkbenchError::InvalidData("empty symbol".into()));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            "starting analysis for {} ({}), generation {}",
            symbol,
            timeframe,
            generation
        );

        self.state.write().await.phase = Phase::Loading;

        let series = match self.fetch_series(&symbol, timeframe).await {
            Ok(series) => series,
            Err(e) => {
                return self
                    .fail(
                        generation,
                        Notice::new(
                            "Failed to fetch data",
                            "Could not retrieve instrument data. Please try again.",
                        ),
                        e,
                    )
                    .await;
            }
        };

        let frame = series.signal_frame();
        let reply = match self.backend.request_analysis(&symbol, &frame).await {
            Ok(reply) => reply,
            Err(e) => {
                return self
                    .fail(
                        generation,
                        Notice::new("Analysis failed", "Could not analyze the chart data."),
                        e,
                    )
                    .await;
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                "discarding superseded analysis result for {} (generation {})",
                symbol,
                generation
            );
            return Ok(());
        }

        let stats = series.stats();
        let session = AnalysisSession::seeded(reply, symbol.clone(), timeframe, series);
        {
            let mut state = self.state.write().await;
            *state = ViewState {
                phase: Phase::Ready,
                session: Some(session),
                stats: Some(stats),
                last_error: None,
            };
        }
        self.recent.lock().await.record(&symbol);
        tracing::info!("analysis ready for {}", symbol);
        Ok(())
    }

    /// Send one conversational turn within the current session.
    ///
    /// Silent no-op (`None`) when no session exists. The user message is
    /// appended before the round trip and never rolled back: a failed
    /// exchange appends the fixed fallback message instead of an assistant
    /// reply and returns `None`.
    pub async fn send_message(&self, text: &str) -> Option<String> {
        let session_id = {
            let state = self.state.read().await;
            state.session.as_ref().map(|s| s.session_id.clone())
        }?;

        self.append_message(&session_id, ChatMessage::user(text)).await;

        match self.backend.send_chat_message(&session_id, text).await {
            Ok(reply) => {
                self.append_message(&session_id, ChatMessage::assistant(reply.clone()))
                    .await;
                Some(reply)
            }
            Err(e) => {
                tracing::warn!("chat exchange failed: {}", e);
                self.append_message(&session_id, ChatMessage::system(CHAT_FALLBACK))
                    .await;
                self.push_notice("Message failed", "Could not send your message.")
                    .await;
                None
            }
        }
    }

    /// Reset the remote prediction model. Local session state is not
    /// touched; a new session only ever comes from [`Self::request_analysis`].
    pub async fn reset(&self) -> Result<(), WorkbenchError> {
        tracing::info!("resetting remote prediction model");
        self.backend.reset_model().await
    }

    /// Invalidate the server-side conversation state of the current
    /// session, if any.
    pub async fn clear_remote_session(&self) -> Result<(), WorkbenchError> {
        let session_id = {
            let state = self.state.read().await;
            state.session.as_ref().map(|s| s.session_id.clone())
        };
        match session_id {
            Some(id) => self.backend.clear_session(&id).await,
            None => Ok(()),
        }
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<InstrumentSeries, WorkbenchError> {
        let key = format!("{}:{}", symbol, timeframe);
        if let Some(entry) = self.series_cache.get(&key) {
            if entry.cached_at.elapsed().as_secs() < CACHE_TTL_SECS {
                tracing::debug!("series cache hit for {}", key);
                return Ok(entry.series.clone());
            }
        }

        let series = self.backend.fetch_instrument_data(symbol, timeframe).await?;
        self.series_cache.insert(
            key,
            CacheEntry {
                series: series.clone(),
                cached_at: Instant::now(),
            },
        );
        Ok(series)
    }

    /// Append to the session the message was sent under. If a newer
    /// session replaced it mid-flight, the outcome is dropped with the old
    /// conversation rather than leaking into the new one.
    async fn append_message(&self, session_id: &str, message: ChatMessage) {
        let mut state = self.state.write().await;
        if let Some(session) = state
            .session
            .as_mut()
            .filter(|s| s.session_id == session_id)
        {
            session.messages.push(message);
        }
    }

    async fn fail(
        &self,
        generation: u64,
        notice: Notice,
        error: WorkbenchError,
    ) -> Result<(), WorkbenchError> {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                "discarding superseded failure (generation {}): {}",
                generation,
                error
            );
            return Ok(());
        }

        tracing::warn!("analysis workflow failed: {}", error);
        {
            let mut state = self.state.write().await;
            state.phase = Phase::Failed;
            state.last_error = Some(error.to_string());
            // session and stats intentionally left as-is for display
        }
        self.push_notice(notice.title, notice.detail).await;
        Err(error)
    }

    async fn push_notice(&self, title: impl Into<String>, detail: impl Into<String>) {
        self.notices.lock().await.push_back(Notice::new(title, detail));
    }
}
