use serde::{Deserialize, Serialize};

/// Quality string the server understands as "highest available".
pub const BEST_QUALITY: &str = "best";

/// Resolutions accepted by the download server, highest first.
pub const KNOWN_QUALITIES: [&str; 8] = [
    "2160p", "1440p", "1080p", "720p", "480p", "360p", "240p", "144p",
];

/// Dropdown value shown before the user ever picked one.
pub const DEFAULT_SELECTED_QUALITY: &str = "1080p";

/// Settings record as it sits in storage. Either key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_quality: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_quality: Option<String>,
}

impl StoredSettings {
    /// The record written on first run.
    pub fn first_run() -> Self {
        Self {
            best_quality: Some(true),
            selected_quality: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.best_quality.is_some()
    }

    /// Every key present, so a write needs nothing from the old record.
    pub fn is_complete(&self) -> bool {
        self.best_quality.is_some() && self.selected_quality.is_some()
    }

    /// Quality to send with a download request.
    ///
    /// `selected_quality` only counts when best quality is explicitly off
    /// and the stored value is non-empty.
    pub fn effective_quality(&self) -> String {
        match (self.best_quality, self.selected_quality.as_deref()) {
            (Some(false), Some(quality)) if !quality.is_empty() => quality.to_string(),
            _ => BEST_QUALITY.to_string(),
        }
    }

    /// Overwrite the keys present in `patch`, leaving the others alone.
    pub fn merge(&mut self, patch: StoredSettings) {
        if let Some(best) = patch.best_quality {
            self.best_quality = Some(best);
        }
        if let Some(quality) = patch.selected_quality {
            self.selected_quality = Some(quality);
        }
    }
}

/// Values of the settings form at the moment of saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub best_quality: bool,
    pub selected_quality: String,
}

impl From<SettingsRecord> for StoredSettings {
    fn from(record: SettingsRecord) -> Self {
        Self {
            best_quality: Some(record.best_quality),
            selected_quality: Some(record.selected_quality),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Youtube,
    General,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadKind::Youtube => "youtube",
            DownloadKind::General => "general",
        }
    }
}

impl std::fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of one download request. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DownloadRequest {
    pub video_url: String,
    #[serde(rename = "type")]
    pub kind: DownloadKind,
    pub quality: String,
}

/// What the panel needs to render after loading settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub best_quality: bool,
    pub selected_quality: Option<String>,
}
