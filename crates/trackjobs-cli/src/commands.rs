use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use trackjobs_core::{
    config::DisplayConfig, query, JobError, JobStatus, JobTable, NewJob, Outcome, Record,
    TrackJobsConfig,
};
use trackjobs_status::{Reconciler, StatusCommand, SystemRunner};
use trackjobs_store::TableStore;

use crate::cli::{dedup_ids, AddArgs, Command, VerdictArgs};
use crate::render::{render_table, RenderOptions};

/// Everything a subcommand needs: where the table lives and how to print.
pub struct App {
    store: TableStore,
    config: TrackJobsConfig,
    json: bool,
}

impl App {
    pub fn new(config: TrackJobsConfig, db_override: Option<String>, json: bool) -> Self {
        let path = db_override.unwrap_or_else(|| config.database.path.clone());
        Self {
            store: TableStore::new(path),
            config,
            json,
        }
    }

    fn display(&self) -> &DisplayConfig {
        &self.config.display
    }

    /// Run one subcommand, writing user-facing output to `out`.
    pub fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Add(args) => self.add(args),
            Command::Del(args) => {
                let ids = dedup_ids(&args.ids);
                self.mutate(|table| {
                    // Validate every id first so a typo deletes nothing.
                    query::select(table, &ids)?;
                    for id in &ids {
                        table.delete(*id)?;
                    }
                    Ok(())
                })
            }
            Command::Mod { id, key, value } => {
                self.mutate(|table| table.modify(id, &key, &value).map(|_| ()))
            }
            Command::UpdateId { id, value } => {
                self.mutate(|table| table.replace_id(id, value).map(|_| ()))
            }
            Command::SetOk(args) => self.set_verdict(args, Outcome::Ok),
            Command::SetFail(args) => self.set_verdict(args, Outcome::Failed),
            Command::Filter {
                key,
                value,
                contains,
                wide,
            } => {
                let table = self.load()?;
                let selected = if contains {
                    query::filter_contains(&table, &key, &value)?
                } else {
                    query::filter(&table, &key, &value)?
                };
                self.print(out, &selected, wide.verbose)
            }
            Command::Sort {
                key,
                desc,
                save,
                wide,
            } => {
                let mut table = self.load()?;
                if save {
                    table.reorder_by(&key, desc)?;
                    self.store.save(&table)?;
                    let all: Vec<&Record> = table.records().iter().collect();
                    self.print(out, &all, wide.verbose)
                } else {
                    let all: Vec<&Record> = table.records().iter().collect();
                    let sorted = query::sort(&all, &key, desc)?;
                    self.print(out, &sorted, wide.verbose)
                }
            }
            Command::Tail { n } => {
                let table = self.load()?;
                let n = n.unwrap_or(self.display().tail);
                self.print(out, &query::tail(&table, n), false)
            }
            Command::Show(args) => {
                let table = self.load()?;
                let selected = query::select(&table, &dedup_ids(&args.ids))?;
                self.print(out, &selected, true)
            }
            Command::ShowAll { wide } => {
                let table = self.load()?;
                let all: Vec<&Record> = table.records().iter().collect();
                self.print(out, &all, wide.verbose)
            }
            Command::ShowUnchecked => {
                let table = self.load()?;
                self.print(out, &query::unchecked(&table), false)
            }
            Command::PrintDir { id } => {
                let table = self.load()?;
                let directory = match table.directory_of(id) {
                    Ok(Some(dir)) => dir.to_string(),
                    Ok(None) => {
                        warn!(job_id = id, "job has no directory, printing current directory");
                        current_dir()?
                    }
                    Err(JobError::NotFound { .. }) => {
                        warn!(job_id = id, "no job with this id, printing current directory");
                        current_dir()?
                    }
                    Err(e) => return Err(e.into()),
                };
                writeln!(out, "{directory}")?;
                Ok(())
            }
            Command::CheckStatus => {
                let command = StatusCommand::load_or_init(
                    Path::new(&self.config.status.command_file),
                    self.config.status.flavor,
                )?;
                let (table, report) =
                    Reconciler::new(command, SystemRunner).check_status(&self.store)?;
                for id in &report.vanished {
                    info!(job_id = *id, "job no longer queued");
                }
                self.print(out, &query::unchecked(&table), false)
            }
        }
    }

    fn load(&self) -> Result<JobTable> {
        self.store
            .load()
            .with_context(|| format!("loading job table {}", self.store.path().display()))
    }

    /// Load, apply `op` and save. Nothing is written if `op` fails.
    fn mutate(&self, op: impl FnOnce(&mut JobTable) -> trackjobs_core::Result<()>) -> Result<()> {
        let mut table = self.load()?;
        op(&mut table)?;
        self.store.save(&table)?;
        Ok(())
    }

    fn add(&self, args: AddArgs) -> Result<()> {
        let directory = match args.directory {
            Some(dir) => dir,
            None => current_dir()?,
        };
        let job = NewJob {
            id: args.id,
            name: args.name,
            script: args.script,
            directory: Some(directory),
            comment: args.comment,
            status: args.status.as_deref().map(JobStatus::from),
        };
        self.mutate(|table| table.add(job).map(|_| ()))
    }

    /// Applied ids are saved even when others fail; the failures are then
    /// reported as one error.
    fn set_verdict(&self, args: VerdictArgs, outcome: Outcome) -> Result<()> {
        let mut table = self.load()?;
        let update = table.set_status(&dedup_ids(&args.ids), outcome, args.comment.as_deref());
        if !update.applied.is_empty() {
            self.store.save(&table)?;
        }
        update.into_result()?;
        Ok(())
    }

    fn print<W: Write>(&self, out: &mut W, records: &[&Record], wide: bool) -> Result<()> {
        if self.json {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
            return Ok(());
        }
        let options = RenderOptions {
            max_width: if wide {
                self.display().verbose_width
            } else {
                self.display().max_width
            },
            show_directory: wide,
        };
        writeln!(out, "{}", render_table(records, &options))?;
        Ok(())
    }
}

fn current_dir() -> Result<String> {
    let dir = std::env::current_dir().context("reading current directory")?;
    Ok(dir.display().to_string())
}
