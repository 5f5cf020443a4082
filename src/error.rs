//! Error types for the remote API and the reorganize workflow.

use thiserror::Error;

use crate::organize::AssetId;

/// Failure of a single call against the photo server.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The blocking worker running the request panicked or was cancelled.
    #[error("request worker failed: {0}")]
    Worker(String),
}

/// Failures raised while reorganizing an album.
///
/// Only [`OrganizeError::Aborted`] escapes the workflow. Every other variant is
/// recorded against the asset or group it belongs to and the run continues.
#[derive(Debug, Clone, Error)]
pub enum OrganizeError {
    #[error("could not read tags of asset {asset_id}: {source}")]
    TagFetch {
        asset_id: AssetId,
        #[source]
        source: ApiError,
    },

    #[error("could not create album '{album_name}': {source}")]
    AlbumCreation {
        album_name: String,
        #[source]
        source: ApiError,
    },

    #[error("could not add assets to album '{album_name}': {reason}")]
    AssetAttach { album_name: String, reason: String },

    #[error("bulk removal from source album failed: {source}")]
    BulkRemoval {
        #[source]
        source: ApiError,
    },

    #[error("could not remove asset {asset_id} from source album: {source}")]
    SingleRemoval {
        asset_id: AssetId,
        #[source]
        source: ApiError,
    },

    #[error("reorganize aborted: {0}")]
    Aborted(#[source] ApiError),
}
