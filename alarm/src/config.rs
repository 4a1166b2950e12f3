use std::{
    ffi::{OsStr, OsString},
    path::PathBuf,
    time::Duration,
};

use crate::{
    cli::Cli,
    error::Error,
    init::config::Settings,
    stdio::{StdinTarget, StdioConfig, StreamTarget},
    supervisor::DumpPolicy,
    timer::{Parser, TimerSpec},
};

/// Everything a run needs, fixed before any resource is touched.
#[derive(Debug, Clone)]
pub struct Config {
    /// never empty, the first element is the command to run
    pub command: Vec<OsString>,
    pub arg0: Option<OsString>,
    pub cwd: Option<PathBuf>,
    pub stdio: StdioConfig,
    /// useless timers are already dropped
    pub timers: Vec<TimerSpec>,
    /// capacity hint of the memory sink in bytes
    pub memory: usize,
    pub drain_grace: Duration,
    pub dump: DumpPolicy,
}

impl Config {
    pub fn new(cli: Cli, settings: &Settings) -> Result<Self, Error> {
        if cli.command.is_empty() {
            return Err(Error::Usage);
        }

        let stream = |flag: Option<String>| {
            match (flag.as_deref().unwrap_or_default(), cli.squelch) {
                ("", true) => StreamTarget::Memory,
                (flag, _) => StreamTarget::from_flag(flag),
            }
        };
        let stdio = StdioConfig {
            stdin: match cli.close_stdin {
                true => StdinTarget::DevNull,
                false => StdinTarget::Inherited,
            },
            stdout: stream(cli.stdout),
            stderr: stream(cli.stderr),
        };

        let parser = Parser {
            default_signal: settings.default_signal,
            force_raw: cli.force_short_timers,
        };
        let timers = parser.parse_list(&cli.time)?;

        Ok(Self {
            command: cli.command,
            arg0: cli.arg0,
            cwd: cli.cwd,
            stdio,
            timers,
            memory: cli.mem.unwrap_or(settings.memory).saturating_mul(1024),
            drain_grace: Duration::from_millis(settings.drain_grace_ms),
            dump: match (cli.dump, cli.squelch) {
                (Some(dump), _) => dump,
                (None, true) => DumpPolicy::OnError,
                (None, false) => settings.dump,
            },
        })
    }
    pub fn program(&self) -> &OsStr {
        &self.command[0]
    }
    pub fn args(&self) -> &[OsString] {
        &self.command[1..]
    }
}
