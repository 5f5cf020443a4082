//! Remote photo library capabilities consumed by the reorganize workflow.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::organize::{AlbumId, AssetId, SourceAlbum};

/// Why the server refused to attach one asset to an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachRejection {
    /// The asset is already in the album.
    Duplicate,
    NoPermission,
    NotFound,
    Other(String),
}

/// Per-asset result of adding assets to an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachResult {
    pub asset_id: AssetId,
    pub rejection: Option<AttachRejection>,
}

impl AttachResult {
    /// Whether the asset is in the album after the call.
    pub fn is_attached(&self) -> bool {
        matches!(self.rejection, None | Some(AttachRejection::Duplicate))
    }
}

/// Operations against the service that owns albums, assets and tags.
///
/// Every call is a single remote round trip; callers await them one at a time.
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Album name and its asset ids in album order.
    async fn fetch_album(&self, album_id: &AlbumId) -> Result<SourceAlbum, ApiError>;

    /// Names of the tags attached to an asset.
    async fn fetch_asset_tags(&self, asset_id: &AssetId) -> Result<Vec<String>, ApiError>;

    /// Create an empty album and return its id.
    async fn create_album(&self, name: &str, description: &str) -> Result<AlbumId, ApiError>;

    async fn add_assets(
        &self,
        album_id: &AlbumId,
        asset_ids: &[AssetId],
    ) -> Result<Vec<AttachResult>, ApiError>;

    /// Remove many assets in one request. Succeeds or fails as a unit.
    async fn remove_assets(&self, album_id: &AlbumId, asset_ids: &[AssetId])
        -> Result<(), ApiError>;

    async fn remove_asset(&self, album_id: &AlbumId, asset_id: &AssetId) -> Result<(), ApiError>;

    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), ApiError>;

    /// Short name for logs.
    fn library_name(&self) -> &'static str;
}
