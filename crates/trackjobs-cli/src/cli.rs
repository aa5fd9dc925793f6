use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "trackjobs",
    version,
    about = "Keep track of jobs submitted to an HPC batch scheduler"
)]
pub struct Cli {
    /// Config file (default: $TRACKJOBS_CONFIG or ~/.trackjobs/trackjobs.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Job table file, overrides `database.path` from the config
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<String>,

    /// Print selected jobs as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a job. The directory defaults to the current one.
    Add(AddArgs),
    /// Delete jobs; nothing is deleted if any id is unknown
    Del(IdsArgs),
    /// Change one column of a job
    Mod {
        #[arg(short = 'I', value_name = "ID")]
        id: i64,
        /// Column to change
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
    },
    /// Replace the id of a job
    UpdateId {
        #[arg(short = 'I', value_name = "ID")]
        id: i64,
        /// New id
        #[arg(long, value_name = "NEW_ID")]
        value: i64,
    },
    /// Mark jobs as finished with status OK
    SetOk(VerdictArgs),
    /// Mark jobs as finished with status FAILED
    SetFail(VerdictArgs),
    /// Show jobs whose column matches a value
    Filter {
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
        /// Substring match for text columns
        #[arg(long)]
        contains: bool,
        #[command(flatten)]
        wide: WideArgs,
    },
    /// Show all jobs sorted by a column
    Sort {
        #[arg(long)]
        key: String,
        #[arg(long)]
        desc: bool,
        /// Write the sorted order back to the table file
        #[arg(short, long)]
        save: bool,
        #[command(flatten)]
        wide: WideArgs,
    },
    /// Show the most recently added jobs
    Tail {
        /// Number of jobs (default: display.tail from the config)
        #[arg(short)]
        n: Option<usize>,
    },
    /// Show selected jobs in full
    Show(IdsArgs),
    /// Show every job
    ShowAll {
        #[command(flatten)]
        wide: WideArgs,
    },
    /// Show jobs without an OK/FAILED verdict (default)
    #[command(alias = "show-unfinished")]
    ShowUnchecked,
    /// Print the directory of a job
    PrintDir {
        #[arg(short = 'I', value_name = "ID")]
        id: i64,
    },
    /// Ask the scheduler for the state of unchecked jobs and record it
    CheckStatus,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(short = 'I', value_name = "ID")]
    pub id: i64,
    #[arg(short = 'N', value_name = "NAME")]
    pub name: String,
    #[arg(short = 'S', value_name = "SCRIPT")]
    pub script: Option<String>,
    #[arg(short = 'D', value_name = "DIR")]
    pub directory: Option<String>,
    #[arg(short = 'C', value_name = "COMMENT")]
    pub comment: Option<String>,
    /// Initial status (default: submitted)
    #[arg(short = 'T', value_name = "STATUS")]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Job id, may be repeated
    #[arg(short = 'I', value_name = "ID", required = true)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Args)]
pub struct VerdictArgs {
    /// Job id, may be repeated
    #[arg(short = 'I', value_name = "ID", required = true)]
    pub ids: Vec<i64>,
    /// Text appended to each job's comment
    #[arg(short = 'C', value_name = "COMMENT")]
    pub comment: Option<String>,
}

#[derive(Debug, Args)]
pub struct WideArgs {
    /// Longer cells and the directory column
    #[arg(short, long)]
    pub verbose: bool,
}

/// Drop repeated ids, keeping the first occurrence.
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
