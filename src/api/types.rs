//! Request and response bodies of the photo server's REST API.

use serde::{Deserialize, Serialize};

use crate::library::{AttachRejection, AttachResult};
use crate::organize::AssetId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: String,
    pub album_name: String,
    #[serde(default)]
    pub assets: Vec<AssetSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AssetSummary {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AssetResponse {
    /// Absent when the asset has never been tagged.
    #[serde(default)]
    pub tags: Option<Vec<TagResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct TagResponse {
    /// Leaf name. The full hierarchical path (`value`) is not used.
    pub name: String,
}

impl AssetResponse {
    pub fn tag_names(self) -> Vec<String> {
        self.tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest<'a> {
    pub album_name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BulkIdsRequest<'a> {
    pub ids: &'a [AssetId],
}

#[derive(Debug, Deserialize)]
pub struct BulkIdResponse {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<BulkIdResponse> for AttachResult {
    fn from(r: BulkIdResponse) -> Self {
        let rejection = if r.success {
            None
        } else {
            Some(match r.error.as_deref() {
                Some("duplicate") => AttachRejection::Duplicate,
                Some("no_permission") => AttachRejection::NoPermission,
                Some("not_found") => AttachRejection::NotFound,
                Some(other) => AttachRejection::Other(other.to_string()),
                None => AttachRejection::Other("unknown".to_string()),
            })
        };
        AttachResult {
            asset_id: AssetId(r.id),
            rejection,
        }
    }
}
