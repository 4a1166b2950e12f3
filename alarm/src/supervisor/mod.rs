//! Launch, watch and report on a single child process.
pub mod dump;
pub mod which;

use std::{io, os::unix::process::ExitStatusExt, process::ExitStatus};

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    process::{Child, Command},
};

pub use dump::DumpPolicy;

use crate::{
    config::Config,
    error::Error,
    stdio::{DescriptorSet, MemorySink},
    timer,
};

/// Lifecycle of a run, strictly in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Configuring,
    DescriptorsReady,
    Launched,
    TimersArmed,
    LocalDescriptorsReleased,
    Waiting,
    Exited,
    Reported,
}

/// Outcome of a finished child
#[derive(Debug)]
pub struct Report {
    pub pid: u32,
    pub status: ExitStatus,
    /// whether the captured output was copied out
    pub dumped: bool,
}

impl Report {
    /// exit code to propagate, `128 + signal` for a signalled child
    pub fn exit_code(&self) -> i32 {
        match self.status.code() {
            Some(code) => code,
            None => 128 + self.status.signal().unwrap_or_default(),
        }
    }
}

pub struct Supervisor<'a> {
    config: &'a Config,
    stage: Stage,
}

impl<'a> Supervisor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            stage: Stage::Configuring,
        }
    }
    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} -> {:?}", self.stage, next);
        log::trace!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
    /// spawn the child with duplicates of `descriptors`
    ///
    /// The [`Command`] and its duplicates are dropped on return, so only
    /// the child and `descriptors` keep the streams open afterward.
    fn launch(&self, descriptors: &DescriptorSet) -> Result<Child, Error> {
        let config = self.config;
        let program = which::resolve(config.program(), std::env::var_os("PATH").as_deref());
        if program.as_os_str() != config.program() {
            log::debug!(
                "Implied arg0: ({}) => {}",
                config.program().to_string_lossy(),
                program.display()
            );
        }

        let [stdin, stdout, stderr] = descriptors.handles()?;
        let mut cmd = Command::new(&program);
        cmd.args(config.args())
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr);
        if let Some(arg0) = &config.arg0 {
            cmd.arg0(arg0);
        }
        if let Some(cwd) = &config.cwd {
            cmd.current_dir(cwd);
        }

        log::trace!("spawn process {:?}", cmd);
        cmd.spawn().map_err(Error::Exec)
    }
    /// Run the child to completion.
    ///
    /// Captured output is written to `out` when the dump policy asks for
    /// it. Timers that have not fired by the time the child is reaped are
    /// cancelled.
    pub async fn run<W>(mut self, out: &mut W) -> Result<Report, Error>
    where
        W: AsyncWrite + Unpin,
    {
        let config = self.config;
        let captured = config.stdio.captures_memory();

        let mut sink = match captured {
            true => Some(
                MemorySink::new(config.memory, config.drain_grace)
                    .map_err(Error::DescriptorSetup)?,
            ),
            false => None,
        };
        let descriptors = DescriptorSet::route(&config.stdio, sink.as_ref())?;
        self.advance(Stage::DescriptorsReady);

        let mut child = self.launch(&descriptors)?;
        let pid = child.id().ok_or_else(|| {
            Error::Exec(io::Error::new(io::ErrorKind::Other, "child has no pid"))
        })?;
        self.advance(Stage::Launched);

        let alarms = timer::arm(pid, &config.timers);
        self.advance(Stage::TimersArmed);

        // the child holds its own copies by now
        if let Some(sink) = sink.as_mut() {
            sink.close_writer();
        }
        descriptors.release();
        self.advance(Stage::LocalDescriptorsReleased);

        self.advance(Stage::Waiting);
        let status = child.wait().await;
        timer::disarm(&alarms);
        let status = status.map_err(Error::Wait)?;
        log::debug!("PID: {} exited with {}", pid, status);
        self.advance(Stage::Exited);

        let buffer = match sink {
            Some(mut sink) => {
                sink.finish();
                sink.collect().await.unwrap_or_else(|err| {
                    log::warn!("Couldn't drain captured output: {}", err);
                    Vec::new()
                })
            }
            None => Vec::new(),
        };

        let report = Report {
            pid,
            status,
            dumped: config.dump.should_dump(status.success(), captured),
        };
        if report.dumped {
            log::debug!("Dumping logs [{}]\n----------", report.exit_code());
            let result: io::Result<()> = async {
                out.write_all(&buffer).await?;
                out.flush().await
            }
            .await;
            if let Err(err) = &result {
                log::warn!("Couldn't dump logs: {}", err);
            }
            log::debug!("\n----------\nLogs complete: {:?}", result);
        }
        self.advance(Stage::Reported);

        Ok(report)
    }
}
