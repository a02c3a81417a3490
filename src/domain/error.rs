use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),
}
