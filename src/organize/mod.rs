//! Reorganize one album into per-tag-combination albums.
//!
//! The flow is leaf-first:
//! - [`grouping`] reads each asset's tags and partitions the album by tag set
//! - [`migrate`] creates one destination album per group and attaches its assets
//! - [`removal`] takes migrated assets out of the source album
//! - [`workflow`] drives the above and reports a single outcome

pub mod grouping;
pub mod migrate;
pub mod removal;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use grouping::{group_assets, Grouping, TagFetchFailure};
pub use migrate::{AlbumMigrator, AttachFailurePolicy, MigrationOutcome};
pub use removal::{remove_from_source, RemovalReport};
pub use workflow::{
    GroupReport, NothingToDo, OrganizeOptions, PlannedAlbum, ReorganizeSummary,
    ReorganizeWorkflow, WorkflowOutcome,
};

/// Opaque identifier of an asset on the photo server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        AssetId(s.to_string())
    }
}

/// Opaque identifier of an album on the photo server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(pub String);

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlbumId {
    fn from(s: &str) -> Self {
        AlbumId(s.to_string())
    }
}

/// Snapshot of the album being reorganized, taken once at the start of a run.
#[derive(Debug, Clone)]
pub struct SourceAlbum {
    pub id: AlbumId,
    pub name: String,
    /// Asset ids in album order.
    pub assets: Vec<AssetId>,
}

/// Sorted, deduplicated set of tag names.
///
/// Compared structurally, so `{x, y}` and `{y, x}` are the same key while
/// `{x}` and `{x, y}` are not. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey(Vec<String>);

impl TagKey {
    /// Build a key from raw tag names. Returns `None` when there are no names.
    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return None;
        }
        names.sort();
        names.dedup();
        Some(TagKey(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Assets sharing exactly one tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub key: TagKey,
    /// Member ids in the order they were discovered.
    pub asset_ids: Vec<AssetId>,
}

impl TagGroup {
    pub fn tag_names(&self) -> &[String] {
        self.key.names()
    }

    /// `<source>_<tag>_<tag>...` with tag names in sorted order.
    pub fn destination_name(&self, source_album_name: &str) -> String {
        format!("{}_{}", source_album_name, self.tag_names().join("_"))
    }

    pub fn destination_description(&self, source_album_name: &str) -> String {
        format!(
            "Assets from '{}' with tags: {}",
            source_album_name,
            self.tag_names().join(", ")
        )
    }
}
