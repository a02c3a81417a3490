pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    DownloadKind, DownloadRequest, PanelState, SettingsRecord, StoredSettings,
    DEFAULT_SELECTED_QUALITY, KNOWN_QUALITIES,
};
