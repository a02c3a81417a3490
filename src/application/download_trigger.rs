use std::sync::Arc;

use serde_json::Value;

use crate::{
    api::{ApiError, ServerClient},
    domain::{DownloadKind, DownloadRequest},
    host::{
        ContextKind, ContextMenuHost, MenuClick, MenuEntry, MenuError, PageContext,
        SettingsStorage, StorageError,
    },
};

pub const YOUTUBE_MENU_ID: &str = "youtubeDownloadMenu";
pub const GENERAL_MENU_ID: &str = "generalDownloadMenu";

/// The two entries this app adds to the video context menu.
pub fn menu_entries() -> Vec<MenuEntry> {
    vec![
        MenuEntry {
            id: YOUTUBE_MENU_ID.to_string(),
            title: "Download YouTube video to server".to_string(),
            contexts: vec![ContextKind::Video],
            document_url_patterns: vec!["*://*.youtube.com/*".to_string()],
            target_url_patterns: Vec::new(),
        },
        MenuEntry {
            id: GENERAL_MENU_ID.to_string(),
            title: "Save video to server".to_string(),
            contexts: vec![ContextKind::Video],
            document_url_patterns: vec!["*://*/*".to_string()],
            target_url_patterns: vec!["*://*/*".to_string()],
        },
    ]
}

/// How a single click ended. Only ever logged by the host.
#[derive(Debug)]
pub enum DispatchOutcome {
    Sent(Value),
    Failed(ApiError),
    Ignored,
}

#[derive(Clone)]
pub struct DownloadTrigger {
    storage: Arc<dyn SettingsStorage>,
    client: ServerClient,
}

impl DownloadTrigger {
    pub fn new(storage: Arc<dyn SettingsStorage>, client: ServerClient) -> Self {
        Self { storage, client }
    }

    /// Safe to call repeatedly: existing entries are dropped first.
    pub fn register_menus(&self, host: &mut dyn ContextMenuHost) -> Result<(), MenuError> {
        host.remove_all();
        for entry in menu_entries() {
            host.create(entry)?;
        }
        Ok(())
    }

    /// Map a click to the request type and the URL to download.
    pub fn target_for(click: &MenuClick, page: &PageContext) -> Option<(DownloadKind, String)> {
        match click.menu_item_id.as_str() {
            YOUTUBE_MENU_ID => Some((DownloadKind::Youtube, page.url.clone())),
            GENERAL_MENU_ID => click
                .src_url
                .clone()
                .map(|src| (DownloadKind::General, src)),
            _ => None,
        }
    }

    pub async fn on_menu_click(
        &self,
        click: &MenuClick,
        page: &PageContext,
    ) -> Result<DispatchOutcome, StorageError> {
        let Some((kind, video_url)) = Self::target_for(click, page) else {
            tracing::warn!(
                menu_item_id = %click.menu_item_id,
                page_url = %page.url,
                "click without a downloadable target, ignoring"
            );
            return Ok(DispatchOutcome::Ignored);
        };

        let quality = self.resolve_quality().await?;
        Ok(self.send_download_request(video_url, kind, quality).await)
    }

    pub async fn resolve_quality(&self) -> Result<String, StorageError> {
        Ok(self.storage.get().await?.effective_quality())
    }

    /// Fire one request. Failures end up in the log, never with the caller.
    pub async fn send_download_request(
        &self,
        video_url: String,
        kind: DownloadKind,
        quality: String,
    ) -> DispatchOutcome {
        let request = DownloadRequest {
            video_url,
            kind,
            quality,
        };

        match self.client.send_download_request(&request).await {
            Ok(reply) => {
                tracing::info!(
                    video_url = %request.video_url,
                    kind = %request.kind,
                    quality = %request.quality,
                    "download request was sent"
                );
                DispatchOutcome::Sent(reply)
            }
            Err(e) => {
                match &e {
                    ApiError::Unreachable(_) => tracing::error!(
                        endpoint = %self.client.endpoint(),
                        error = %e,
                        "download server unreachable"
                    ),
                    ApiError::Status { .. } => tracing::error!(
                        video_url = %request.video_url,
                        error = %e,
                        "download server rejected request"
                    ),
                    ApiError::InvalidResponse(_) => tracing::error!(
                        video_url = %request.video_url,
                        error = %e,
                        "download server sent an unreadable reply"
                    ),
                }
                DispatchOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServerConfig;
    use crate::domain::StoredSettings;
    use crate::host::storage::memory::MemoryStorage;
    use crate::host::{ClickTarget, MenuRegistry};
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/extension/download-to-server";

    fn trigger(storage: MemoryStorage, base_url: String) -> DownloadTrigger {
        DownloadTrigger::new(
            Arc::new(storage),
            ServerClient::new(ServerConfig {
                base_url,
                download_path: PATH.to_string(),
            }),
        )
    }

    fn click(id: &str, src: Option<&str>) -> MenuClick {
        MenuClick {
            menu_item_id: id.to_string(),
            src_url: src.map(str::to_string),
        }
    }

    fn page(url: &str) -> PageContext {
        PageContext {
            url: url.to_string(),
        }
    }

    #[test]
    fn register_menus_is_idempotent() {
        let trigger = trigger(MemoryStorage::default(), "http://127.0.0.1:1".to_string());
        let mut registry = MenuRegistry::new();

        trigger.register_menus(&mut registry).unwrap();
        trigger.register_menus(&mut registry).unwrap();

        let titles: Vec<_> = registry.entries().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Download YouTube video to server", "Save video to server"]
        );
    }

    #[test]
    fn registered_menus_scope_to_youtube_pages() {
        let trigger = trigger(MemoryStorage::default(), "http://127.0.0.1:1".to_string());
        let mut registry = MenuRegistry::new();
        trigger.register_menus(&mut registry).unwrap();

        let elsewhere = ClickTarget {
            page_url: "https://example.com/watch".to_string(),
            context: ContextKind::Video,
            src_url: Some("https://example.com/v.mp4".to_string()),
        };
        let ids: Vec<_> = registry
            .visible_for(&elsewhere)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, [GENERAL_MENU_ID]);
    }

    #[test]
    fn target_for_picks_url_by_entry() {
        assert_eq!(
            DownloadTrigger::target_for(
                &click(YOUTUBE_MENU_ID, Some("blob:https://www.youtube.com/x")),
                &page("https://www.youtube.com/watch?v=abc")
            ),
            Some((
                DownloadKind::Youtube,
                "https://www.youtube.com/watch?v=abc".to_string()
            ))
        );
        assert_eq!(
            DownloadTrigger::target_for(
                &click(GENERAL_MENU_ID, Some("https://example.com/v.mp4")),
                &page("https://example.com/")
            ),
            Some((DownloadKind::General, "https://example.com/v.mp4".to_string()))
        );
        assert_eq!(
            DownloadTrigger::target_for(&click(GENERAL_MENU_ID, None), &page("https://a/")),
            None
        );
        assert_eq!(
            DownloadTrigger::target_for(&click("other", None), &page("https://a/")),
            None
        );
    }

    #[tokio::test]
    async fn resolve_quality_reads_current_settings() {
        let unset = trigger(MemoryStorage::default(), "http://127.0.0.1:1".to_string());
        assert_eq!(unset.resolve_quality().await.unwrap(), "best");

        let chosen = trigger(
            MemoryStorage::with(StoredSettings {
                best_quality: Some(false),
                selected_quality: Some("360p".to_string()),
            }),
            "http://127.0.0.1:1".to_string(),
        );
        assert_eq!(chosen.resolve_quality().await.unwrap(), "360p");
    }

    #[tokio::test]
    async fn youtube_click_posts_page_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Json(json!({
                "video_url": "https://www.youtube.com/watch?v=abc",
                "type": "youtube",
                "quality": "best"
            })))
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let trigger = trigger(
            MemoryStorage::with(StoredSettings {
                best_quality: Some(true),
                selected_quality: Some("720p".to_string()),
            }),
            server.url(),
        );
        let outcome = trigger
            .on_menu_click(
                &click(YOUTUBE_MENU_ID, None),
                &page("https://www.youtube.com/watch?v=abc"),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Sent(Value::Null)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn general_click_posts_src_url_with_selected_quality() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Json(json!({
                "video_url": "https://example.com/v.mp4",
                "type": "general",
                "quality": "720p"
            })))
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let trigger = trigger(
            MemoryStorage::with(StoredSettings {
                best_quality: Some(false),
                selected_quality: Some("720p".to_string()),
            }),
            server.url(),
        );
        let outcome = trigger
            .on_menu_click(
                &click(GENERAL_MENU_ID, Some("https://example.com/v.mp4")),
                &page("https://example.com/watch"),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Sent(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn every_click_sends_its_own_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("null")
            .expect(3)
            .create_async()
            .await;

        let trigger = trigger(MemoryStorage::default(), server.url());
        for _ in 0..3 {
            trigger
                .on_menu_click(
                    &click(GENERAL_MENU_ID, Some("https://example.com/v.mp4")),
                    &page("https://example.com/"),
                )
                .await
                .unwrap();
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_failure_is_swallowed_into_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_body(r#"{"error":"error downloading video to server","message":""}"#)
            .create_async()
            .await;

        let trigger = trigger(MemoryStorage::default(), server.url());
        let outcome = trigger
            .on_menu_click(
                &click(GENERAL_MENU_ID, Some("https://example.com/v.mp4")),
                &page("https://example.com/"),
            )
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Failed(e) => assert_eq!(e.kind(), "status"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn click_without_target_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let trigger = trigger(MemoryStorage::default(), server.url());
        let outcome = trigger
            .on_menu_click(&click(GENERAL_MENU_ID, None), &page("https://example.com/"))
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Ignored));
        mock.assert_async().await;
    }
}
