use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::supervisor::DumpPolicy;

/// Run a command with deadline signals and optional output capture
#[derive(Debug, Parser)]
#[command(name = "alarm", version)]
pub struct Cli {
    /// Replace stdin with /dev/null
    #[arg(long)]
    pub close_stdin: bool,
    /// List of timeouts 'secs[:signal][,...]'; 0 as signal just reports liveness
    #[arg(long, default_value = "")]
    pub time: String,
    /// argv[0] to use (default=CMD)
    #[arg(long)]
    pub arg0: Option<OsString>,
    /// Working directory (default=CWD)
    #[arg(long)]
    pub cwd: Option<PathBuf>,
    /// Verbose logging
    #[arg(long)]
    pub verbose: bool,
    /// Don't auto-adjust values < 1 second
    #[arg(long)]
    pub force_short_timers: bool,
    /// File to log stdout to, or 'memory'
    #[arg(long)]
    pub stdout: Option<String>,
    /// File to log stderr to, or 'memory'
    #[arg(long)]
    pub stderr: Option<String>,
    /// Amount of memory to use for 'memory' outputs (KB)
    #[arg(long)]
    pub mem: Option<usize>,
    /// Dump the logs when
    #[arg(long, value_enum)]
    pub dump: Option<DumpPolicy>,
    /// Implies --stdout=memory --stderr=memory --dump=onerror
    #[arg(long)]
    pub squelch: bool,
    #[arg(
        value_name = "CMD",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}
