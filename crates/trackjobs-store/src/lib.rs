//! `trackjobs-store`: the persisted job table.
//!
//! The table lives in one SQLite file. [`TableStore::load`] reads it whole,
//! [`TableStore::save`] rewrites it whole into a temporary file and renames
//! that over the previous file, so a crash mid-write never leaves a truncated table.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::TableStore;
