use crate::application::SettingsPanel;
use crate::domain::PanelState;
use crate::ui::{SettingsMessage, SettingsView};
use iced::Task;

pub struct SettingsApp {
    view: SettingsView,
    panel: SettingsPanel,
}

impl SettingsApp {
    /// Build the app and kick off loading the stored settings.
    pub fn boot(panel: SettingsPanel, qualities: Vec<String>) -> (Self, Task<Message>) {
        let app = Self {
            view: SettingsView::new(qualities),
            panel: panel.clone(),
        };

        let load = Task::perform(
            async move { panel.initialize().await },
            Message::SettingsLoaded,
        );

        (app, load)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(SettingsMessage),
    SettingsLoaded(PanelState),
    /// Write finished and, on success, the confirmation was dismissed
    SettingsSaved(Result<(), String>),
}

pub fn update(app: &mut SettingsApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            if let SettingsMessage::SavePressed = ui_msg {
                if app.view.is_loaded && !app.view.is_saving {
                    let panel = app.panel.clone();
                    let record = app.view.form();

                    app.view.is_saving = true;
                    app.view.status_message = "Saving...".to_string();

                    return Task::perform(
                        async move { panel.save(record).await.map_err(|e| e.to_string()) },
                        Message::SettingsSaved,
                    );
                }
            }
        }
        Message::SettingsLoaded(state) => app.view.apply(state),
        Message::SettingsSaved(result) => {
            app.view.is_saving = false;
            match result {
                Ok(()) => app.view.status_message.clear(),
                Err(e) => {
                    app.view.status_message = format!("Failed to save settings: {}", e);
                }
            }
        }
    }
    Task::none()
}

pub fn view(app: &SettingsApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
