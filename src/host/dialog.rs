use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a message and return once the user dismissed it.
    async fn acknowledge(&self, message: &str);
}

/// Native message box.
pub struct RfdNotifier {
    title: String,
}

impl RfdNotifier {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[async_trait]
impl Notifier for RfdNotifier {
    async fn acknowledge(&self, message: &str) {
        rfd::AsyncMessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(&self.title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show()
            .await;
    }
}
