use thiserror::Error;

/// Application-level error type.
/// Every variant is recoverable: commands report it and the next invocation starts fresh.
#[derive(Debug, Error)]
pub enum AppError {
    /// Blank required input. Never reaches the collaborator.
    #[error("{0}")]
    Validation(String),

    #[error("Profile store error: {0}")]
    Store(String),

    #[error("Could not read document: {0}")]
    Ingest(String),

    #[error("Quiz error: {0}")]
    Quiz(#[from] crate::quiz::QuizError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message suitable for the terminal. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Store(msg) => {
                tracing::error!("Store error: {msg}");
                format!("Could not save your profile: {msg}")
            }
            AppError::Ingest(msg) => format!("Could not read document: {msg}"),
            AppError::Quiz(e) => e.to_string(),
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                "A file system error occurred".to_string()
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {e}");
                "Could not encode output".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        }
    }
}
