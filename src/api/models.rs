use serde::{Deserialize, Serialize};

/// Error body returned by the download server on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ServerErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.error)
        } else {
            write!(f, "{} ({})", self.error, self.message)
        }
    }
}

/// Where download requests go
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// `/extension/download-to-server` or `/videos/download`
    pub download_path: String,
}

impl ServerConfig {
    pub fn download_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.download_path.trim_start_matches('/')
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            download_path: "/extension/download-to-server".to_string(),
        }
    }
}
