use async_trait::async_trait;

use crate::error::WorkbenchError;
use crate::types::{AnalysisReply, InstrumentSeries, SignalFrame, Timeframe};

/// Remote analysis service boundary.
///
/// The workbench core only depends on these semantics; the HTTP shape lives
/// in `backend-client`, and tests substitute programmable fakes.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Fetch the historical series and derived signals for one instrument.
    async fn fetch_instrument_data(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<InstrumentSeries, WorkbenchError>;

    /// Produce an analysis narrative for the given signals and open a chat
    /// session for follow-up questions.
    async fn request_analysis(
        &self,
        symbol: &str,
        signals: &SignalFrame,
    ) -> Result<AnalysisReply, WorkbenchError>;

    /// Exchange one conversational turn within an existing session.
    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<String, WorkbenchError>;

    /// Drop server-side conversation state for a session.
    async fn clear_session(&self, session_id: &str) -> Result<(), WorkbenchError>;

    /// Reset the remote prediction model.
    async fn reset_model(&self) -> Result<(), WorkbenchError>;
}
