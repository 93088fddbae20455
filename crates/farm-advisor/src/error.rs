use advisor_core::error::AdvisorError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    #[error("config error: {0}")]
    Config(String),

    #[error("knowledge error: {0}")]
    Knowledge(String),
}
