//! The queue-query command file.
//!
//! Line one holds the program, every following non-empty line one argument.
//! No shell is involved, so arguments are passed exactly as written.

use std::path::Path;

use tracing::info;
use trackjobs_core::SchedulerFlavor;

use crate::error::{Result, StatusError};

/// Default for slurm: one `JOB_ID STATE` pair per line, no header.
const SLURM_DEFAULT: &[&str] = &["squeue", "--noheader", "--format=%.18i %.9T"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl StatusCommand {
    /// Built-in command for `flavor`, if there is one.
    pub fn builtin(flavor: SchedulerFlavor) -> Option<Self> {
        match flavor {
            SchedulerFlavor::Slurm => Some(Self::from_parts(SLURM_DEFAULT)),
            SchedulerFlavor::Custom => None,
        }
    }

    fn from_parts(parts: &[&str]) -> Self {
        Self {
            program: parts[0].to_string(),
            args: parts[1..].iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse the command file contents. `None` when there is no program line.
    pub fn parse(contents: &str) -> Option<Self> {
        let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());
        let program = lines.next()?.to_string();
        Some(Self {
            program,
            args: lines.map(String::from).collect(),
        })
    }

    /// File contents that [`StatusCommand::parse`] reads back as `self`.
    pub fn to_file_contents(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push('\n');
            out.push_str(arg);
        }
        out.push('\n');
        out
    }

    /// Read the command file at `path`.
    ///
    /// If the file does not exist and `flavor` has a built-in command, the
    /// built-in is written to `path` (creating parent directories) and used.
    pub fn load_or_init(path: &Path, flavor: SchedulerFlavor) -> Result<Self> {
        let io_err = |source: std::io::Error| StatusError::Io {
            path: path.to_path_buf(),
            source,
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).ok_or_else(|| StatusError::MissingConfig {
                path: path.to_path_buf(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let command = Self::builtin(flavor).ok_or_else(|| StatusError::MissingConfig {
                    path: path.to_path_buf(),
                })?;
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(io_err)?;
                }
                std::fs::write(path, command.to_file_contents()).map_err(io_err)?;
                info!(path = %path.display(), program = %command.program, "wrote default status query command");
                Ok(command)
            }
            Err(e) => Err(io_err(e)),
        }
    }
}

impl std::fmt::Display for StatusCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
