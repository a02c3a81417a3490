use std::sync::Arc;

use crate::{
    domain::{AppError, PanelState, SettingsRecord, StoredSettings},
    host::{Notifier, SettingsStorage},
};

pub const SAVED_MESSAGE: &str = "Settings saved!";

/// Storage side of the settings form.
#[derive(Clone)]
pub struct SettingsPanel {
    storage: Arc<dyn SettingsStorage>,
    notifier: Arc<dyn Notifier>,
}

impl SettingsPanel {
    pub fn new(storage: Arc<dyn SettingsStorage>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    /// Load the record for display, writing the first-run default if needed.
    ///
    /// Always yields a renderable state: an unreadable record is treated as
    /// a first run, and a failed default write still shows the default.
    pub async fn initialize(&self) -> PanelState {
        let stored = match self.storage.get().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "could not read settings, using defaults");
                StoredSettings::default()
            }
        };

        if !stored.is_initialized() {
            tracing::info!("no saved settings, defaulting to best quality");
            if let Err(e) = self.storage.set(StoredSettings::first_run()).await {
                tracing::error!(error = %e, "failed to write default settings");
            }
            return PanelState {
                best_quality: true,
                selected_quality: None,
            };
        }

        PanelState {
            best_quality: stored.best_quality.unwrap_or(true),
            selected_quality: stored.selected_quality.filter(|q| !q.is_empty()),
        }
    }

    /// Write both fields in one call, then wait for the user to dismiss
    /// the confirmation. Nothing is confirmed when the write fails.
    pub async fn save(&self, record: SettingsRecord) -> Result<(), AppError> {
        tracing::debug!(
            best_quality = record.best_quality,
            selected_quality = %record.selected_quality,
            "saving settings"
        );

        if let Err(e) = self.storage.set(record.into()).await {
            tracing::error!(error = %e, "failed to save settings");
            return Err(AppError::Storage(e.to_string()));
        }

        self.notifier.acknowledge(SAVED_MESSAGE).await;
        Ok(())
    }
}
