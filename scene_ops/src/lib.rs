//! Editor-facing bulk operations over the scene data core
//!
//! UI panels and the AI tool layer funnel multi-entity edits through this
//! crate; each request returns an aggregated textual report instead of
//! raising on partial failure.

pub mod bulk;

pub use bulk::{apply_bulk_edit, BulkEdit, BulkReport};
