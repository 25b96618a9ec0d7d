use serde::{Deserialize, Serialize};
use session_core::{AnalysisSession, SeriesStats};

/// Workflow phase of the analysis session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Renderable snapshot of the controller.
///
/// A failed workflow keeps the previous session and stats so the UI never
/// drops back to a blank screen; `last_error` carries the display reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub phase: Phase,
    pub session: Option<AnalysisSession>,
    pub stats: Option<SeriesStats>,
    pub last_error: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
            stats: None,
            last_error: None,
        }
    }
}

/// Transient user-facing notification, drained by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}
