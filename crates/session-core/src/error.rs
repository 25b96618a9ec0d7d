use thiserror::Error;

/// Error taxonomy for the analysis workbench.
///
/// `Fetch` and `Analysis` abort an in-progress workflow; `Chat` is absorbed
/// into the conversation transcript; `Storage` is swallowed by the
/// recent-symbol store and never reaches a caller.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("data fetch failed: {0}")]
    Fetch(String),

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("chat failed: {0}")]
    Chat(String),

    #[error("invalid series data: {0}")]
    InvalidData(String),

    #[error("storage error: {0}")]
    Storage(String),
}
