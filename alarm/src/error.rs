use std::{io, path::PathBuf};

/// Process exit codes, one per failure class.
///
/// On a clean run the child's own exit status replaces [`exit::OK`].
pub mod exit {
    pub const OK: i32 = 0;
    pub const USAGE: i32 = 1;
    pub const EXEC: i32 = 2;
    pub const NULL: i32 = 3;
    pub const BAD_TIMESPEC: i32 = 4;
    pub const FD_SETUP: i32 = 5;
    pub const WAIT: i32 = 6;
    pub const FILE: i32 = 7;
    /// an internal bug, same as the default for a panicking Rust program
    pub const PANIC: i32 = 101;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("USAGE: alarm [--alarmopts] CMD cmdflags")]
    Usage,
    #[error("{0}")]
    BadTimeSpec(#[from] crate::timer::Error),
    #[error("Couldn't open /dev/null (required to close stdin): {0}")]
    NullDevice(io::Error),
    #[error("Couldn't open log file {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("Couldn't setup file descriptors: {0}")]
    DescriptorSetup(io::Error),
    #[error("There was an error running the command: {0}")]
    Exec(io::Error),
    #[error("There was an error waiting for pid: {0}")]
    Wait(io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage => exit::USAGE,
            Error::BadTimeSpec(_) => exit::BAD_TIMESPEC,
            Error::NullDevice(_) => exit::NULL,
            Error::File { .. } => exit::FILE,
            Error::DescriptorSetup(_) => exit::FD_SETUP,
            Error::Exec(_) => exit::EXEC,
            Error::Wait(_) => exit::WAIT,
        }
    }
}
