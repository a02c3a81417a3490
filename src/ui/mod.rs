use iced::{
    widget::{button, checkbox, column, pick_list, row, text, Space},
    Element, Length,
};

use crate::domain::{PanelState, SettingsRecord, DEFAULT_SELECTED_QUALITY};

/// Settings form state
pub struct SettingsView {
    pub best_quality: bool,
    pub selected_quality: String,
    pub qualities: Vec<String>,
    pub status_message: String,
    pub is_loaded: bool,
    pub is_saving: bool,
}

impl SettingsView {
    pub fn new(qualities: Vec<String>) -> Self {
        Self {
            best_quality: true,
            selected_quality: DEFAULT_SELECTED_QUALITY.to_string(),
            qualities,
            status_message: "Loading settings...".to_string(),
            is_loaded: false,
            is_saving: false,
        }
    }

    pub fn quality_enabled(&self) -> bool {
        !self.best_quality
    }

    pub fn apply(&mut self, state: PanelState) {
        self.best_quality = state.best_quality;
        if let Some(quality) = state.selected_quality {
            self.selected_quality = quality;
        }
        self.is_loaded = true;
        self.status_message.clear();
    }

    pub fn form(&self) -> SettingsRecord {
        SettingsRecord {
            best_quality: self.best_quality,
            selected_quality: self.selected_quality.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SettingsMessage {
    BestQualityToggled(bool),
    QualitySelected(String),
    SavePressed,
}

impl SettingsView {
    /// Local form changes only; saving is handled by the app.
    pub fn update(&mut self, message: SettingsMessage) {
        match message {
            SettingsMessage::BestQualityToggled(checked) => {
                self.best_quality = checked;
            }
            SettingsMessage::QualitySelected(quality) => {
                if self.quality_enabled() {
                    self.selected_quality = quality;
                }
            }
            SettingsMessage::SavePressed => {}
        }
    }

    pub fn view(&self) -> Element<'_, SettingsMessage> {
        let quality: Element<'_, SettingsMessage> = if self.quality_enabled() {
            pick_list(
                self.qualities.as_slice(),
                Some(self.selected_quality.clone()),
                SettingsMessage::QualitySelected,
            )
            .padding(10)
            .width(Length::Fill)
            .into()
        } else {
            text(&self.selected_quality).size(16).into()
        };

        let save = button("Save");
        let save = if self.is_loaded && !self.is_saving {
            save.on_press(SettingsMessage::SavePressed)
        } else {
            save
        };

        column![
            text("Video to Server").size(28),
            Space::new().height(Length::Fixed(10.0)),
            checkbox(self.best_quality)
                .label("Use best quality")
                .on_toggle(SettingsMessage::BestQualityToggled),
            row![text("Quality:").size(16), quality].spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            save.padding([10, 20]),
            text(&self.status_message).size(14),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
