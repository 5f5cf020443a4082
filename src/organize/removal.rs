//! Take migrated assets out of the source album.
//!
//! One bulk request is tried first. If it fails, every id gets exactly one
//! individual request, in order, and individual failures do not stop the rest.
//! The bulk request is never repeated or split.

use super::{AlbumId, AssetId};
use crate::error::OrganizeError;
use crate::library::PhotoLibrary;

#[derive(Debug, Clone)]
pub enum RemovalReport {
    /// The bulk request succeeded for the whole set.
    Bulk { removed: usize },
    /// The bulk request failed and ids were removed one by one.
    Fallback {
        bulk_error: OrganizeError,
        removed: Vec<AssetId>,
        failed: Vec<(AssetId, OrganizeError)>,
    },
}

impl RemovalReport {
    pub fn removed_count(&self) -> usize {
        match self {
            RemovalReport::Bulk { removed } => *removed,
            RemovalReport::Fallback { removed, .. } => removed.len(),
        }
    }

    /// Ids still in the source album although they were migrated.
    pub fn failed_ids(&self) -> Vec<&AssetId> {
        match self {
            RemovalReport::Bulk { .. } => Vec::new(),
            RemovalReport::Fallback { failed, .. } => failed.iter().map(|(id, _)| id).collect(),
        }
    }
}

pub async fn remove_from_source<L>(
    library: &L,
    source_album: &AlbumId,
    asset_ids: &[AssetId],
) -> RemovalReport
where
    L: PhotoLibrary + ?Sized,
{
    tracing::info!(
        album_id = %source_album,
        count = asset_ids.len(),
        "Removing migrated assets from source album"
    );

    let bulk_error = match library.remove_assets(source_album, asset_ids).await {
        Ok(()) => {
            return RemovalReport::Bulk {
                removed: asset_ids.len(),
            }
        }
        Err(e) => {
            tracing::warn!(
                album_id = %source_album,
                error = %e,
                "Bulk removal failed, removing assets one by one"
            );
            OrganizeError::BulkRemoval { source: e }
        }
    };

    let mut removed = Vec::with_capacity(asset_ids.len());
    let mut failed = Vec::new();
    for asset_id in asset_ids {
        match library.remove_asset(source_album, asset_id).await {
            Ok(()) => removed.push(asset_id.clone()),
            Err(e) => {
                tracing::error!(
                    album_id = %source_album,
                    asset_id = %asset_id,
                    error = %e,
                    "Failed to remove asset from source album"
                );
                failed.push((
                    asset_id.clone(),
                    OrganizeError::SingleRemoval {
                        asset_id: asset_id.clone(),
                        source: e,
                    },
                ));
            }
        }
    }

    RemovalReport::Fallback {
        bulk_error,
        removed,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organize::testing::{ids, Call, FakeLibrary};

    #[tokio::test]
    async fn test_bulk_success_uses_one_call() {
        let library = FakeLibrary::new().with_album("src", "Trip", &[("a", "x"), ("b", "x")]);

        let report = remove_from_source(&library, &AlbumId::from("src"), &ids("a b")).await;

        assert!(matches!(report, RemovalReport::Bulk { removed: 2 }));
        assert_eq!(
            library.calls(),
            vec![Call::RemoveAssets(AlbumId::from("src"), ids("a b"))]
        );
        assert_eq!(library.album_assets("src").unwrap(), Vec::<AssetId>::new());
    }

    #[tokio::test]
    async fn test_bulk_failure_falls_back_once_per_id() {
        let library = FakeLibrary::new()
            .with_album("src", "Trip", &[("a", "x"), ("b", "x"), ("c", "y")])
            .failing_bulk_remove();
        let album = AlbumId::from("src");

        let report = remove_from_source(&library, &album, &ids("a b c")).await;

        assert_eq!(
            library.calls(),
            vec![
                Call::RemoveAssets(album.clone(), ids("a b c")),
                Call::RemoveAsset(album.clone(), AssetId::from("a")),
                Call::RemoveAsset(album.clone(), AssetId::from("b")),
                Call::RemoveAsset(album.clone(), AssetId::from("c")),
            ]
        );
        assert_eq!(report.removed_count(), 3);
        assert!(report.failed_ids().is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_does_not_stop_fallback() {
        let library = FakeLibrary::new()
            .with_album("src", "Trip", &[("a", "x"), ("b", "x"), ("c", "y")])
            .failing_bulk_remove()
            .failing_single_remove("a")
            .failing_single_remove("b");
        let album = AlbumId::from("src");

        let report = remove_from_source(&library, &album, &ids("a b c")).await;

        let singles = library
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::RemoveAsset(..)))
            .count();
        assert_eq!(singles, 3);
        assert_eq!(report.removed_count(), 1);
        assert_eq!(
            report.failed_ids(),
            vec![&AssetId::from("a"), &AssetId::from("b")]
        );
        assert_eq!(library.album_assets("src").unwrap(), ids("a b"));
    }
}
