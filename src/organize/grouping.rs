//! Partition an album's assets by their tag sets.

use indexmap::IndexMap;

use super::{AssetId, TagGroup, TagKey};
use crate::error::OrganizeError;
use crate::library::PhotoLibrary;

/// An asset whose tags could not be read. It takes no part in grouping.
#[derive(Debug, Clone)]
pub struct TagFetchFailure {
    pub asset_id: AssetId,
    pub error: OrganizeError,
}

/// Result of grouping one album snapshot.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    /// Groups in the order their tag set was first seen.
    pub groups: Vec<TagGroup>,
    pub failures: Vec<TagFetchFailure>,
    /// Assets that carry no tags at all.
    pub untagged: usize,
}

impl Grouping {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn grouped_assets(&self) -> usize {
        self.groups.iter().map(|g| g.asset_ids.len()).sum()
    }
}

/// Read each asset's tags once and bucket the asset under its tag set.
///
/// Lookups run one at a time in snapshot order. A failed lookup is recorded
/// and the asset skipped; untagged assets are skipped silently.
pub async fn group_assets<L>(library: &L, assets: &[AssetId]) -> Grouping
where
    L: PhotoLibrary + ?Sized,
{
    let mut buckets: IndexMap<TagKey, Vec<AssetId>> = IndexMap::new();
    let mut failures = Vec::new();
    let mut untagged = 0;

    for asset_id in assets {
        let names = match library.fetch_asset_tags(asset_id).await {
            Ok(names) => names,
            Err(e) => {
                tracing::error!(asset_id = %asset_id, error = %e, "Failed to read asset tags");
                failures.push(TagFetchFailure {
                    asset_id: asset_id.clone(),
                    error: OrganizeError::TagFetch {
                        asset_id: asset_id.clone(),
                        source: e,
                    },
                });
                continue;
            }
        };

        match TagKey::from_names(names) {
            Some(key) => buckets.entry(key).or_default().push(asset_id.clone()),
            None => untagged += 1,
        }
    }

    tracing::debug!(
        groups = buckets.len(),
        failures = failures.len(),
        untagged,
        "Grouped assets by tag set"
    );

    Grouping {
        groups: buckets
            .into_iter()
            .map(|(key, asset_ids)| TagGroup { key, asset_ids })
            .collect(),
        failures,
        untagged,
    }
}
