pub mod client;
pub mod models;

pub use client::{ApiError, ServerClient};
pub use models::ServerConfig;
