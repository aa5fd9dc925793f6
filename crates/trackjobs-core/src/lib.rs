//! `trackjobs-core`: record model and table operations for the job database.
//!
//! A [`JobTable`] is a plain value: load it, apply one operation, hand it to
//! the store. Mutations live on the table ([`table`]), read-only views in
//! [`query`], and both consult the column descriptors in [`column`] for
//! coercion and ordering.
//!
//! | Operation        | Entry point                    |
//! |------------------|--------------------------------|
//! | add / del        | [`JobTable::add`], [`JobTable::delete`] |
//! | mod / update-id  | [`JobTable::modify`], [`JobTable::replace_id`] |
//! | set-ok / set-fail| [`JobTable::set_status`]       |
//! | filter / sort    | [`query::filter`], [`query::sort`] |
//! | tail / unchecked | [`query::tail`], [`query::unchecked`] |

pub mod column;
pub mod config;
pub mod error;
pub mod query;
pub mod table;
pub mod types;

pub use column::{CellValue, Column, ColumnKind};
pub use config::{SchedulerFlavor, TrackJobsConfig};
pub use error::{CoreError, JobError, Result};
pub use table::{JobTable, StatusUpdate};
pub use types::{JobStatus, NewJob, Outcome, Record};
