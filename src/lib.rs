//! Split a photo album into one album per tag combination.
//!
//! Assets are grouped by the exact set of tag names they carry. Each group
//! gets a new album named after the source album and its tags, the group's
//! assets are added to it, and migrated assets are removed from the source.

pub mod api;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod notify;
pub mod organize;

pub use error::{ApiError, OrganizeError};
pub use library::PhotoLibrary;
pub use notify::{Notification, NotificationSink, Severity};
pub use organize::{AlbumId, AssetId, OrganizeOptions, ReorganizeWorkflow, WorkflowOutcome};
