//! Business logic services for the back office.

pub mod catalog;
pub mod labels;

pub use catalog::{CatalogSyncService, SyncReport};
pub use labels::LabelService;
