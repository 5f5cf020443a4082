//! In-memory photo library for workflow tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{AlbumId, AssetId, SourceAlbum};
use crate::error::ApiError;
use crate::library::{AttachRejection, AttachResult, PhotoLibrary};

/// One remote call, as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchAlbum(AlbumId),
    FetchAssetTags(AssetId),
    CreateAlbum(String),
    AddAssets(AlbumId, Vec<AssetId>),
    RemoveAssets(AlbumId, Vec<AssetId>),
    RemoveAsset(AlbumId, AssetId),
    DeleteAlbum(AlbumId),
}

#[derive(Debug, Default)]
struct State {
    albums: HashMap<AlbumId, (String, Vec<AssetId>)>,
    tags: HashMap<AssetId, Vec<String>>,
    calls: Vec<Call>,
    next_album: u32,
}

#[derive(Debug, Default)]
struct Faults {
    album_fetch: bool,
    tag_fetch: HashSet<AssetId>,
    create: HashSet<String>,
    add: HashSet<String>,
    rejections: HashMap<AssetId, AttachRejection>,
    /// Result for the key asset is reported under the value asset's id.
    misreported: HashMap<AssetId, AssetId>,
    bulk_remove: bool,
    single_remove: HashSet<AssetId>,
    delete: bool,
}

#[derive(Debug, Default)]
pub struct FakeLibrary {
    state: Mutex<State>,
    faults: Faults,
}

/// Asset ids from a space separated list.
pub fn ids(raw: &str) -> Vec<AssetId> {
    raw.split_whitespace().map(AssetId::from).collect()
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "injected failure".to_string(),
    }
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an album. Each asset comes with its tag names separated by spaces.
    pub fn with_album(self, id: &str, name: &str, assets: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let ids = assets.iter().map(|(a, _)| AssetId::from(*a)).collect();
            state.albums.insert(AlbumId::from(id), (name.to_string(), ids));
            for (asset, tags) in assets {
                state.tags.insert(
                    AssetId::from(*asset),
                    tags.split_whitespace().map(str::to_string).collect(),
                );
            }
        }
        self
    }

    pub fn failing_album_fetch(mut self) -> Self {
        self.faults.album_fetch = true;
        self
    }

    pub fn failing_tag_fetch(mut self, asset: &str) -> Self {
        self.faults.tag_fetch.insert(AssetId::from(asset));
        self
    }

    pub fn failing_create(mut self, album_name: &str) -> Self {
        self.faults.create.insert(album_name.to_string());
        self
    }

    pub fn failing_add(mut self, album_name: &str) -> Self {
        self.faults.add.insert(album_name.to_string());
        self
    }

    pub fn rejecting(mut self, asset: &str, rejection: AttachRejection) -> Self {
        self.faults.rejections.insert(AssetId::from(asset), rejection);
        self
    }

    /// Answer for `asset` using the id of `reported`.
    pub fn reporting_as(mut self, asset: &str, reported: &str) -> Self {
        self.faults
            .misreported
            .insert(AssetId::from(asset), AssetId::from(reported));
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.faults.delete = true;
        self
    }

    pub fn failing_bulk_remove(mut self) -> Self {
        self.faults.bulk_remove = true;
        self
    }

    pub fn failing_single_remove(mut self, asset: &str) -> Self {
        self.faults.single_remove.insert(AssetId::from(asset));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change server state.
    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::FetchAlbum(_) | Call::FetchAssetTags(_)))
            .collect()
    }

    pub fn album_assets(&self, id: &str) -> Option<Vec<AssetId>> {
        let state = self.state.lock().unwrap();
        state.albums.get(&AlbumId::from(id)).map(|(_, a)| a.clone())
    }

    pub fn album_by_name(&self, name: &str) -> Option<(AlbumId, Vec<AssetId>)> {
        let state = self.state.lock().unwrap();
        state
            .albums
            .iter()
            .find(|(_, (n, _))| n == name)
            .map(|(id, (_, a))| (id.clone(), a.clone()))
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn album_name(&self, id: &AlbumId) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.albums.get(id).map(|(n, _)| n.clone())
    }
}

#[async_trait]
impl PhotoLibrary for FakeLibrary {
    async fn fetch_album(&self, album_id: &AlbumId) -> Result<SourceAlbum, ApiError> {
        self.record(Call::FetchAlbum(album_id.clone()));
        if self.faults.album_fetch {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        let state = self.state.lock().unwrap();
        let (name, assets) = state.albums.get(album_id).ok_or(ApiError::Status {
            status: 404,
            body: "album not found".to_string(),
        })?;
        Ok(SourceAlbum {
            id: album_id.clone(),
            name: name.clone(),
            assets: assets.clone(),
        })
    }

    async fn fetch_asset_tags(&self, asset_id: &AssetId) -> Result<Vec<String>, ApiError> {
        self.record(Call::FetchAssetTags(asset_id.clone()));
        if self.faults.tag_fetch.contains(asset_id) {
            return Err(server_error());
        }
        let state = self.state.lock().unwrap();
        Ok(state.tags.get(asset_id).cloned().unwrap_or_default())
    }

    async fn create_album(&self, name: &str, _description: &str) -> Result<AlbumId, ApiError> {
        self.record(Call::CreateAlbum(name.to_string()));
        if self.faults.create.contains(name) {
            return Err(server_error());
        }
        let mut state = self.state.lock().unwrap();
        state.next_album += 1;
        let id = AlbumId(format!("album-{}", state.next_album));
        state.albums.insert(id.clone(), (name.to_string(), Vec::new()));
        Ok(id)
    }

    async fn add_assets(
        &self,
        album_id: &AlbumId,
        asset_ids: &[AssetId],
    ) -> Result<Vec<AttachResult>, ApiError> {
        self.record(Call::AddAssets(album_id.clone(), asset_ids.to_vec()));
        if let Some(name) = self.album_name(album_id) {
            if self.faults.add.contains(&name) {
                return Err(server_error());
            }
        }
        let mut state = self.state.lock().unwrap();
        let mut results = Vec::new();
        for id in asset_ids {
            let rejection = self.faults.rejections.get(id).cloned();
            if rejection.is_none() {
                if let Some((_, assets)) = state.albums.get_mut(album_id) {
                    assets.push(id.clone());
                }
            }
            let reported = self.faults.misreported.get(id).unwrap_or(id);
            results.push(AttachResult {
                asset_id: reported.clone(),
                rejection,
            });
        }
        Ok(results)
    }

    async fn remove_assets(
        &self,
        album_id: &AlbumId,
        asset_ids: &[AssetId],
    ) -> Result<(), ApiError> {
        self.record(Call::RemoveAssets(album_id.clone(), asset_ids.to_vec()));
        if self.faults.bulk_remove {
            return Err(server_error());
        }
        let mut state = self.state.lock().unwrap();
        if let Some((_, assets)) = state.albums.get_mut(album_id) {
            assets.retain(|a| !asset_ids.contains(a));
        }
        Ok(())
    }

    async fn remove_asset(&self, album_id: &AlbumId, asset_id: &AssetId) -> Result<(), ApiError> {
        self.record(Call::RemoveAsset(album_id.clone(), asset_id.clone()));
        if self.faults.single_remove.contains(asset_id) {
            return Err(server_error());
        }
        let mut state = self.state.lock().unwrap();
        if let Some((_, assets)) = state.albums.get_mut(album_id) {
            assets.retain(|a| a != asset_id);
        }
        Ok(())
    }

    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), ApiError> {
        self.record(Call::DeleteAlbum(album_id.clone()));
        if self.faults.delete {
            return Err(server_error());
        }
        self.state.lock().unwrap().albums.remove(album_id);
        Ok(())
    }

    fn library_name(&self) -> &'static str {
        "fake"
    }
}
