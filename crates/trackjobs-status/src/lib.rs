//! `trackjobs-status`: reconcile local job records with the batch scheduler.
//!
//! A pass reads the queue-query command file ([`command`]), runs it through a
//! [`CommandRunner`], parses the `JOB_ID STATUS` lines ([`parse`]) and merges
//! the result into the unchecked jobs ([`reconcile`]):
//!
//! | Job in queue output? | New status            | `checked` |
//! |----------------------|-----------------------|-----------|
//! | yes                  | reported code, as is  | unchanged |
//! | no                   | `Finished?`           | unchanged |
//!
//! Only the user turns a job into `OK`/`FAILED`.

pub mod command;
pub mod error;
pub mod parse;
pub mod reconcile;
pub mod runner;

pub use command::StatusCommand;
pub use error::{Result, StatusError};
pub use parse::{parse_queue_output, QueueSnapshot};
pub use reconcile::{reconcile, ReconcileReport, Reconciler, Transition};
pub use runner::{CommandRunner, SystemRunner};
