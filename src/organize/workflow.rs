//! Drive a full reorganize run for one album.
//!
//! A run moves through `Fetching -> Grouping -> Migrating -> Removing ->
//! Reporting`, or ends early when there is nothing to do. Errors that no
//! step recovers from end the run as `Aborted`. Every run sends exactly one
//! outcome notification.

use indexmap::IndexSet;

use super::grouping::{group_assets, TagFetchFailure};
use super::migrate::{AlbumMigrator, AttachFailurePolicy, MigrationOutcome};
use super::removal::{remove_from_source, RemovalReport};
use super::{AlbumId, AssetId};
use crate::error::OrganizeError;
use crate::library::PhotoLibrary;
use crate::notify::{Notification, NotificationSink, Severity};

/// Knobs for one run. Built by the caller; the workflow reads no config.
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    pub attach_failure: AttachFailurePolicy,
    /// Group and plan, but create, add and remove nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fetching,
    Grouping,
    NoTags,
    Migrating,
    Removing,
    Reporting,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingToDo {
    EmptyAlbum,
    NoTaggedAssets,
}

/// A destination album a dry run would create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAlbum {
    pub name: String,
    pub description: String,
    pub asset_ids: Vec<AssetId>,
}

#[derive(Debug, Clone)]
pub struct GroupReport {
    pub album_name: String,
    pub tags: Vec<String>,
    pub outcome: MigrationOutcome,
}

#[derive(Debug, Clone)]
pub struct ReorganizeSummary {
    pub source_album: AlbumId,
    pub source_name: String,
    pub albums_created: usize,
    /// Every id confirmed in a destination album, in migration order.
    pub migrated: Vec<AssetId>,
    pub groups: Vec<GroupReport>,
    pub tag_failures: Vec<TagFetchFailure>,
    pub untagged: usize,
    /// `None` when nothing was migrated.
    pub removal: Option<RemovalReport>,
}

impl ReorganizeSummary {
    pub fn assets_moved(&self) -> usize {
        self.migrated.len()
    }

    pub fn failed_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.outcome.is_success())
    }
}

#[derive(Debug, Clone)]
pub enum WorkflowOutcome {
    NothingToDo(NothingToDo),
    Planned(Vec<PlannedAlbum>),
    Completed(ReorganizeSummary),
    Aborted(OrganizeError),
}

pub struct ReorganizeWorkflow<'a, L: ?Sized, N: ?Sized> {
    library: &'a L,
    sink: &'a N,
    migrator: AlbumMigrator,
    dry_run: bool,
}

impl<'a, L, N> ReorganizeWorkflow<'a, L, N>
where
    L: PhotoLibrary + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(library: &'a L, sink: &'a N, options: OrganizeOptions) -> Self {
        Self {
            library,
            sink,
            migrator: AlbumMigrator::new(options.attach_failure),
            dry_run: options.dry_run,
        }
    }

    /// Reorganize `album_id`. Never fails; the outcome carries what happened.
    pub async fn run(&self, album_id: &AlbumId) -> WorkflowOutcome {
        match self.execute(album_id).await {
            Ok(outcome) => outcome,
            Err(error) => {
                self.enter(Phase::Aborted);
                tracing::error!(
                    album_id = %album_id,
                    error = %error,
                    "Error organizing album by tags"
                );
                self.sink.notify(Notification::outcome(
                    Severity::Error,
                    "Failed to organize album by tags",
                ));
                WorkflowOutcome::Aborted(error)
            }
        }
    }

    async fn execute(&self, album_id: &AlbumId) -> Result<WorkflowOutcome, OrganizeError> {
        self.enter(Phase::Fetching);
        let album = self
            .library
            .fetch_album(album_id)
            .await
            .map_err(OrganizeError::Aborted)?;

        if album.assets.is_empty() {
            self.sink.notify(Notification::outcome(
                Severity::Warning,
                "No assets found in album",
            ));
            return Ok(WorkflowOutcome::NothingToDo(NothingToDo::EmptyAlbum));
        }

        self.sink.notify(Notification::progress(format!(
            "Processing {} assets in album {}",
            album.assets.len(),
            album.name
        )));

        self.enter(Phase::Grouping);
        let grouping = group_assets(self.library, &album.assets).await;

        if grouping.is_empty() {
            self.enter(Phase::NoTags);
            self.sink.notify(Notification::outcome(
                Severity::Warning,
                "No tagged assets found in this album",
            ));
            return Ok(WorkflowOutcome::NothingToDo(NothingToDo::NoTaggedAssets));
        }

        if self.dry_run {
            let plan: Vec<PlannedAlbum> = grouping
                .groups
                .iter()
                .map(|g| PlannedAlbum {
                    name: g.destination_name(&album.name),
                    description: g.destination_description(&album.name),
                    asset_ids: g.asset_ids.clone(),
                })
                .collect();
            self.sink.notify(Notification::outcome(
                Severity::Info,
                format!(
                    "Would create {} new albums and move {} assets",
                    plan.len(),
                    grouping.grouped_assets()
                ),
            ));
            return Ok(WorkflowOutcome::Planned(plan));
        }

        self.enter(Phase::Migrating);
        let mut albums_created = 0;
        let mut migrated: IndexSet<AssetId> = IndexSet::new();
        let mut groups = Vec::with_capacity(grouping.groups.len());

        for group in &grouping.groups {
            let outcome = self.migrator.migrate(self.library, &album.name, group).await;
            if outcome.is_success() {
                albums_created += 1;
                migrated.extend(outcome.migrated_ids().iter().cloned());
            }
            groups.push(GroupReport {
                album_name: group.destination_name(&album.name),
                tags: group.tag_names().to_vec(),
                outcome,
            });
        }

        let migrated: Vec<AssetId> = migrated.into_iter().collect();

        let removal = if migrated.is_empty() {
            None
        } else {
            self.enter(Phase::Removing);
            Some(remove_from_source(self.library, &album.id, &migrated).await)
        };

        self.enter(Phase::Reporting);
        let summary = ReorganizeSummary {
            source_album: album.id,
            source_name: album.name,
            albums_created,
            migrated,
            groups,
            tag_failures: grouping.failures,
            untagged: grouping.untagged,
            removal,
        };

        tracing::info!(
            album = %summary.source_name,
            albums_created = summary.albums_created,
            assets_moved = summary.assets_moved(),
            failed_groups = summary.failed_groups().count(),
            tag_failures = summary.tag_failures.len(),
            "Album reorganized"
        );
        self.sink.notify(Notification::outcome(
            Severity::Info,
            format!(
                "Created {} new albums and moved {} assets",
                summary.albums_created,
                summary.assets_moved()
            ),
        ));

        Ok(WorkflowOutcome::Completed(summary))
    }

    fn enter(&self, phase: Phase) {
        tracing::debug!(library = self.library.library_name(), phase = ?phase, "Reorganize phase");
    }
}
