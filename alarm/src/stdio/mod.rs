//! Routing of the child's standard streams.
pub mod memory;

use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::OwnedFd,
    path::PathBuf,
    process::Stdio,
};

pub use memory::MemorySink;

use crate::error::Error;

static NULL_DEVICE: &str = "/dev/null";
static MEMORY_SENTINEL: &str = "memory";

/// Destination of stdout or stderr
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamTarget {
    #[default]
    Inherited,
    File(PathBuf),
    Memory,
}

impl StreamTarget {
    /// `""` inherits, `"memory"` captures, anything else is a file path
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "" => StreamTarget::Inherited,
            x if x == MEMORY_SENTINEL => StreamTarget::Memory,
            path => StreamTarget::File(PathBuf::from(path)),
        }
    }
    pub fn is_memory(&self) -> bool {
        matches!(self, StreamTarget::Memory)
    }
}

/// Source of stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdinTarget {
    #[default]
    Inherited,
    DevNull,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdioConfig {
    pub stdin: StdinTarget,
    pub stdout: StreamTarget,
    pub stderr: StreamTarget,
}

impl StdioConfig {
    pub fn captures_memory(&self) -> bool {
        self.stdout.is_memory() || self.stderr.is_memory()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Inherited,
    /// index into [`DescriptorSet::opened`]
    Opened(usize),
}

/// The stdin/stdout/stderr handed to the child.
///
/// Owns every descriptor it opened until [`DescriptorSet::release`].
/// Inherited streams are never closed.
#[derive(Debug)]
pub struct DescriptorSet {
    slots: [Slot; 3],
    opened: Vec<OwnedFd>,
}

impl DescriptorSet {
    /// Resolve the three streams.
    ///
    /// stderr reuses stdout's descriptor when both name the same target, so
    /// writes to a shared file or the memory sink interleave in order. On
    /// failure everything opened so far is closed.
    pub fn route(config: &StdioConfig, sink: Option<&MemorySink>) -> Result<Self, Error> {
        let mut set = DescriptorSet {
            slots: [Slot::Inherited; 3],
            opened: Vec::new(),
        };

        if config.stdin == StdinTarget::DevNull {
            let null = File::open(NULL_DEVICE).map_err(Error::NullDevice)?;
            set.slots[0] = set.push(null.into());
        }

        set.slots[1] = set.open(&config.stdout, sink)?;
        set.slots[2] = match config.stderr == config.stdout {
            true => set.slots[1],
            false => set.open(&config.stderr, sink)?,
        };

        Ok(set)
    }
    fn push(&mut self, fd: OwnedFd) -> Slot {
        self.opened.push(fd);
        Slot::Opened(self.opened.len() - 1)
    }
    fn open(&mut self, target: &StreamTarget, sink: Option<&MemorySink>) -> Result<Slot, Error> {
        let fd = match target {
            StreamTarget::Inherited => return Ok(Slot::Inherited),
            StreamTarget::Memory => {
                let sink = sink.ok_or_else(|| {
                    Error::DescriptorSetup(io::Error::new(
                        io::ErrorKind::NotFound,
                        "no memory sink",
                    ))
                })?;
                sink.try_clone_writer().map_err(Error::DescriptorSetup)?
            }
            StreamTarget::File(path) => OpenOptions::new()
                .create(true)
                .write(true)
                .open(path)
                .map_err(|source| Error::File {
                    path: path.clone(),
                    source,
                })?
                .into(),
        };
        Ok(self.push(fd))
    }
    fn stdio(&self, slot: Slot) -> io::Result<Stdio> {
        match slot {
            Slot::Inherited => Ok(Stdio::inherit()),
            Slot::Opened(idx) => Ok(self.opened[idx].try_clone()?.into()),
        }
    }
    /// Handles for one launch, in stdin/stdout/stderr order.
    ///
    /// Each is a duplicate that the launcher owns and closes on its own.
    pub fn handles(&self) -> Result<[Stdio; 3], Error> {
        let [stdin, stdout, stderr] = self.slots;
        Ok([
            self.stdio(stdin).map_err(Error::DescriptorSetup)?,
            self.stdio(stdout).map_err(Error::DescriptorSetup)?,
            self.stdio(stderr).map_err(Error::DescriptorSetup)?,
        ])
    }
    /// number of descriptors that [`DescriptorSet::release`] will close
    pub fn opened(&self) -> usize {
        self.opened.len()
    }
    /// close every descriptor opened by [`DescriptorSet::route`]
    pub fn release(self) {
        log::trace!("releasing {} local descriptors", self.opened());
        drop(self.opened);
    }
}
