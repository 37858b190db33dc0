//! HTTP client for mnemo-server
//!
//! The controller and journal talk to the server through the [`MusicBackend`]
//! and [`MemoryBackend`] traits so tests can substitute an in-process fake.

use mnemo_common::Memory;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

use crate::error::{Result, UiError};

/// A playable file from the server's music folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryTrack {
    pub name: String,
    pub url: String,
}

/// Persisted audio settings as returned by the server
///
/// Fields stay loosely typed; the controller normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AudioSettings {
    #[serde(default)]
    pub global_playlist: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
}

/// Partial settings write; `None` fields are omitted from the request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_playlist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Editor submission; `id` selects update over create
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDraft {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub emotion: String,
    pub memory_date: String,
    pub music_playlist: Vec<String>,
    pub image: Option<ImageFile>,
}

pub trait MusicBackend: Send + Sync + 'static {
    fn fetch_library(&self) -> impl Future<Output = Result<Vec<LibraryTrack>>> + Send;

    fn fetch_settings(&self) -> impl Future<Output = Result<AudioSettings>> + Send;

    fn save_settings(
        &self,
        update: AudioSettingsUpdate,
    ) -> impl Future<Output = Result<AudioSettings>> + Send;
}

pub trait MemoryBackend: Send + Sync + 'static {
    fn list_memories(&self) -> impl Future<Output = Result<Vec<Memory>>> + Send;

    fn get_memory(&self, id: &str) -> impl Future<Output = Result<Memory>> + Send;

    fn save_memory(&self, draft: &MemoryDraft) -> impl Future<Output = Result<Memory>> + Send;

    fn delete_memory(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Deserialize)]
struct MusicFilesResponse {
    #[serde(default)]
    files: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed client for a running mnemo-server
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn memory_path(id: &str) -> String {
        format!(
            "/api/memories/{}",
            mnemo_common::playlist::encode_path_component(id)
        )
    }

    /// Turn a non-2xx response into [`UiError::Status`], keeping the server's
    /// `{"error": ...}` message when present
    async fn check(path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.error);
        Err(UiError::Status {
            url: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| UiError::Decode(format!("{}: {}", path, e)))
    }

    fn memory_form(draft: &MemoryDraft) -> Result<Form> {
        let playlist = serde_json::to_string(&draft.music_playlist)
            .map_err(|e| UiError::InvalidInput(e.to_string()))?;

        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("content", draft.content.clone())
            .text("emotion", draft.emotion.clone())
            .text("memory_date", draft.memory_date.clone())
            .text("music_playlist", playlist);

        if let Some(image) = &draft.image {
            form = form.part(
                "image",
                Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
            );
        }
        Ok(form)
    }
}

impl MusicBackend for HttpBackend {
    async fn fetch_library(&self) -> Result<Vec<LibraryTrack>> {
        let body: MusicFilesResponse = self.get_json("/api/music/files").await?;
        // Entries without a string name and url are skipped
        Ok(body
            .files
            .into_iter()
            .filter_map(|item| serde_json::from_value::<LibraryTrack>(item).ok())
            .collect())
    }

    async fn fetch_settings(&self) -> Result<AudioSettings> {
        self.get_json("/api/audio/settings").await
    }

    async fn save_settings(&self, update: AudioSettingsUpdate) -> Result<AudioSettings> {
        let path = "/api/audio/settings";
        debug!("Saving audio settings: {:?}", update);
        let response = self.client.put(self.url(path)).json(&update).send().await?;
        let response = Self::check(path, response).await?;
        response
            .json::<AudioSettings>()
            .await
            .map_err(|e| UiError::Decode(format!("{}: {}", path, e)))
    }
}

impl MemoryBackend for HttpBackend {
    async fn list_memories(&self) -> Result<Vec<Memory>> {
        self.get_json("/api/memories").await
    }

    async fn get_memory(&self, id: &str) -> Result<Memory> {
        self.get_json(&Self::memory_path(id)).await
    }

    async fn save_memory(&self, draft: &MemoryDraft) -> Result<Memory> {
        let form = Self::memory_form(draft)?;
        let (path, request) = match &draft.id {
            Some(id) => {
                let path = Self::memory_path(id);
                let request = self.client.put(self.url(&path));
                (path, request)
            }
            None => {
                let path = "/api/memories".to_string();
                let request = self.client.post(self.url(&path));
                (path, request)
            }
        };

        let response = request.multipart(form).send().await?;
        let response = Self::check(&path, response).await?;
        response
            .json::<Memory>()
            .await
            .map_err(|e| UiError::Decode(format!("{}: {}", path, e)))
    }

    async fn delete_memory(&self, id: &str) -> Result<()> {
        let path = Self::memory_path(id);
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check(&path, response).await?;
        Ok(())
    }
}
