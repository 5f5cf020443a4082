//! Move one tag group into its own album.

use serde::{Deserialize, Serialize};

use super::{AlbumId, AssetId, TagGroup};
use crate::error::OrganizeError;
use crate::library::{AttachRejection, PhotoLibrary};

/// What to do with a freshly created album when none of the group's assets
/// could be attached to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachFailurePolicy {
    /// Leave the album in place and report it.
    #[default]
    Keep,
    /// Delete the album again. A failed delete is logged and the album is
    /// reported as left behind.
    DeleteAlbum,
}

/// Result of migrating one group.
#[derive(Debug, Clone)]
pub enum MigrationOutcome {
    /// Album created and every asset attached.
    Migrated {
        album_id: AlbumId,
        asset_ids: Vec<AssetId>,
    },
    /// Album created but the server refused some assets. Only `migrated`
    /// may leave the source album.
    Partial {
        album_id: AlbumId,
        migrated: Vec<AssetId>,
        rejected: Vec<(AssetId, AttachRejection)>,
    },
    /// Nothing moved. `orphan` is a destination album that was created and
    /// still exists.
    Failed {
        orphan: Option<AlbumId>,
        error: OrganizeError,
    },
}

impl MigrationOutcome {
    /// Ids that are confirmed in the destination album.
    pub fn migrated_ids(&self) -> &[AssetId] {
        match self {
            MigrationOutcome::Migrated { asset_ids, .. } => asset_ids,
            MigrationOutcome::Partial { migrated, .. } => migrated,
            MigrationOutcome::Failed { .. } => &[],
        }
    }

    /// Whether this group counts as a created album in the summary.
    pub fn is_success(&self) -> bool {
        !matches!(self, MigrationOutcome::Failed { .. })
    }
}

/// Creates destination albums and attaches group members to them.
#[derive(Debug, Clone, Default)]
pub struct AlbumMigrator {
    policy: AttachFailurePolicy,
}

impl AlbumMigrator {
    pub fn new(policy: AttachFailurePolicy) -> Self {
        Self { policy }
    }

    /// Create the group's album, then add the group's assets to it.
    pub async fn migrate<L>(
        &self,
        library: &L,
        source_album_name: &str,
        group: &TagGroup,
    ) -> MigrationOutcome
    where
        L: PhotoLibrary + ?Sized,
    {
        let album_name = group.destination_name(source_album_name);
        let description = group.destination_description(source_album_name);

        let album_id = match library.create_album(&album_name, &description).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(album = %album_name, error = %e, "Failed to create album");
                return MigrationOutcome::Failed {
                    orphan: None,
                    error: OrganizeError::AlbumCreation {
                        album_name,
                        source: e,
                    },
                };
            }
        };
        tracing::debug!(album = %album_name, album_id = %album_id, "Created album");

        let results = match library.add_assets(&album_id, &group.asset_ids).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(album = %album_name, error = %e, "Failed to add assets to album");
                let reason = e.to_string();
                return self.fail_attach(library, album_id, album_name, reason).await;
            }
        };

        let mut migrated = Vec::new();
        let mut rejected = Vec::new();
        for result in results {
            // Ignore ids that were not sent, and repeats.
            if !group.asset_ids.contains(&result.asset_id) || migrated.contains(&result.asset_id) {
                continue;
            }
            if result.is_attached() {
                migrated.push(result.asset_id);
            } else if let Some(rejection) = result.rejection {
                tracing::warn!(
                    album = %album_name,
                    asset_id = %result.asset_id,
                    reason = ?rejection,
                    "Asset was not added to album"
                );
                rejected.push((result.asset_id, rejection));
            }
        }

        if migrated.is_empty() {
            let reason = format!("no asset was accepted ({} rejected)", rejected.len());
            return self.fail_attach(library, album_id, album_name, reason).await;
        }

        if group.asset_ids.iter().all(|id| migrated.contains(id)) {
            MigrationOutcome::Migrated {
                album_id,
                asset_ids: migrated,
            }
        } else {
            MigrationOutcome::Partial {
                album_id,
                migrated,
                rejected,
            }
        }
    }

    async fn fail_attach<L>(
        &self,
        library: &L,
        album_id: AlbumId,
        album_name: String,
        reason: String,
    ) -> MigrationOutcome
    where
        L: PhotoLibrary + ?Sized,
    {
        let orphan = match self.policy {
            AttachFailurePolicy::Keep => Some(album_id),
            AttachFailurePolicy::DeleteAlbum => match library.delete_album(&album_id).await {
                Ok(()) => {
                    tracing::info!(album = %album_name, "Deleted empty album");
                    None
                }
                Err(e) => {
                    tracing::error!(
                        album = %album_name,
                        error = %e,
                        "Failed to delete empty album"
                    );
                    Some(album_id)
                }
            },
        };

        MigrationOutcome::Failed {
            orphan,
            error: OrganizeError::AssetAttach { album_name, reason },
        }
    }
}
