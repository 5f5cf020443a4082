use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::types::{
    AlbumResponse, AssetResponse, BulkIdResponse, BulkIdsRequest, CreateAlbumRequest,
};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::library::{AttachResult, PhotoLibrary};
use crate::organize::{AlbumId, AssetId, SourceAlbum};

/// Photo library backed by the server's REST API.
///
/// `ureq` is blocking, so every request runs on tokio's blocking pool and the
/// async caller only suspends while it waits.
#[derive(Clone)]
pub struct HttpLibrary {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLibrary {
    pub fn new(config: &ServerConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Send one request and hand the response to `read` on the blocking pool.
    async fn execute<T, F>(
        &self,
        method: &'static str,
        path: String,
        body: Option<serde_json::Value>,
        read: F,
    ) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(ureq::Response) -> Result<T, ApiError> + Send + 'static,
    {
        let url = self.url(&path);
        let agent = self.agent.clone();
        let api_key = self.api_key.clone();

        tracing::debug!(method, url = %url, "Sending request");

        tokio::task::spawn_blocking(move || {
            let mut request = agent.request(method, &url).set("Accept", "application/json");
            if let Some(key) = &api_key {
                request = request.set("x-api-key", key);
            }

            let response = match body {
                Some(body) => request.send_json(body),
                None => request.call(),
            }
            .map_err(map_ureq_error)?;

            read(response)
        })
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?
    }

    async fn json<T>(
        &self,
        method: &'static str,
        path: String,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.execute(method, path, body, |response| {
            response
                .into_json::<T>()
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
        .await
    }

    async fn no_content(
        &self,
        method: &'static str,
        path: String,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.execute(method, path, body, |_| Ok(())).await
    }
}

fn encode<T: Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn map_ureq_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::Status(status, response) => ApiError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}

#[async_trait]
impl PhotoLibrary for HttpLibrary {
    async fn fetch_album(&self, album_id: &AlbumId) -> Result<SourceAlbum, ApiError> {
        let album: AlbumResponse = self
            .json("GET", format!("/albums/{}", album_id), None)
            .await?;

        Ok(SourceAlbum {
            id: AlbumId(album.id),
            name: album.album_name,
            assets: album.assets.into_iter().map(|a| AssetId(a.id)).collect(),
        })
    }

    async fn fetch_asset_tags(&self, asset_id: &AssetId) -> Result<Vec<String>, ApiError> {
        let asset: AssetResponse = self
            .json("GET", format!("/assets/{}", asset_id), None)
            .await?;
        Ok(asset.tag_names())
    }

    async fn create_album(&self, name: &str, description: &str) -> Result<AlbumId, ApiError> {
        let body = encode(&CreateAlbumRequest {
            album_name: name,
            description,
        })?;
        let album: AlbumResponse = self.json("POST", "/albums".to_string(), Some(body)).await?;
        Ok(AlbumId(album.id))
    }

    async fn add_assets(
        &self,
        album_id: &AlbumId,
        asset_ids: &[AssetId],
    ) -> Result<Vec<AttachResult>, ApiError> {
        let body = encode(&BulkIdsRequest { ids: asset_ids })?;
        let results: Vec<BulkIdResponse> = self
            .json("PUT", format!("/albums/{}/assets", album_id), Some(body))
            .await?;
        Ok(results.into_iter().map(AttachResult::from).collect())
    }

    async fn remove_assets(
        &self,
        album_id: &AlbumId,
        asset_ids: &[AssetId],
    ) -> Result<(), ApiError> {
        let body = encode(&BulkIdsRequest { ids: asset_ids })?;
        self.no_content("DELETE", format!("/albums/{}/assets", album_id), Some(body))
            .await
    }

    async fn remove_asset(&self, album_id: &AlbumId, asset_id: &AssetId) -> Result<(), ApiError> {
        let ids = std::slice::from_ref(asset_id);
        let body = encode(&BulkIdsRequest { ids })?;
        self.no_content("DELETE", format!("/albums/{}/assets", album_id), Some(body))
            .await
    }

    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), ApiError> {
        self.no_content("DELETE", format!("/albums/{}", album_id), None)
            .await
    }

    fn library_name(&self) -> &'static str {
        "http"
    }
}
