//! Core data model for the ChartMind analysis workbench.
//!
//! Shared types for instrument series, predictions, chart points and chat
//! sessions, the error taxonomy, and the trait boundary to the remote
//! analysis service.

pub mod error;
pub mod traits;
pub mod types;

pub use error::WorkbenchError;
pub use traits::AnalysisBackend;
pub use types::{
    AnalysisReply, AnalysisSession, ChartPoint, ChatMessage, InstrumentSeries, ModelPerformance,
    PredictionHorizons, PredictionSet, Role, SeriesStats, Signal, SignalFrame, Timeframe,
};
