pub mod download_trigger;
pub mod settings_panel;

pub use download_trigger::{DispatchOutcome, DownloadTrigger};
pub use settings_panel::SettingsPanel;
