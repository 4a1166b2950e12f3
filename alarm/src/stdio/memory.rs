use std::{future, io, os::fd::OwnedFd, time::Duration};

use rustix::pipe::{pipe_with, PipeFlags};
use tokio::{
    io::AsyncReadExt,
    net::unix::pipe::Receiver,
    select,
    sync::oneshot,
    task::JoinHandle,
    time,
};

/// upper bound of the up-front reservation, the buffer still grows past it
pub const MAX_RESERVE: usize = 64 * 1024 * 1024;

/// A pipe whose read end is continuously drained into a growable buffer.
///
/// Every stream routed to memory writes into the same pipe, so the buffer
/// holds the output of all of them in the order it was written.
pub struct MemorySink {
    writer: Option<OwnedFd>,
    done: Option<oneshot::Sender<()>>,
    drain: JoinHandle<io::Result<Vec<u8>>>,
}

impl MemorySink {
    /// create the pipe and start the drain task
    ///
    /// Must be called within a tokio runtime.
    pub fn new(capacity: usize, grace: Duration) -> io::Result<Self> {
        let (reader, writer) = pipe_with(PipeFlags::CLOEXEC)?;
        let reader = Receiver::from_owned_fd(reader)?;
        let (done, done_rx) = oneshot::channel();

        let drain = tokio::spawn(drain(reader, reserve(capacity), done_rx, grace));

        Ok(Self {
            writer: Some(writer),
            done: Some(done),
            drain,
        })
    }
    /// duplicate the write end, to be handed to a child
    pub fn try_clone_writer(&self) -> io::Result<OwnedFd> {
        match &self.writer {
            Some(writer) => writer.try_clone(),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory sink writer already closed",
            )),
        }
    }
    /// drop the write end held by this process
    pub fn close_writer(&mut self) {
        self.writer.take();
    }
    /// tell the drain that the writers are expected to be gone
    pub fn finish(&mut self) {
        if let Some(done) = self.done.take() {
            done.send(()).ok();
        }
    }
    /// wait for the drain task and take the buffer
    pub async fn collect(mut self) -> io::Result<Vec<u8>> {
        self.close_writer();
        self.finish();
        self.drain
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?
    }
}

/// empty buffer with room for `capacity` bytes, as far as that is sensible
fn reserve(capacity: usize) -> Vec<u8> {
    let mut buffer = Vec::new();
    let wanted = capacity.min(MAX_RESERVE);
    if wanted < capacity {
        log::warn!(
            "memory hint of {} bytes capped at {} bytes",
            capacity,
            MAX_RESERVE
        );
    }
    if let Err(err) = buffer.try_reserve(wanted) {
        log::warn!("Couldn't reserve {} bytes for captured output: {}", wanted, err);
    }
    buffer
}

/// copy until end-of-stream
///
/// Once `done` fires, the copy is cut off after `grace` even without
/// end-of-stream, in case a grandchild still holds the write end.
async fn drain(
    mut reader: Receiver,
    mut buffer: Vec<u8>,
    done: oneshot::Receiver<()>,
    grace: Duration,
) -> io::Result<Vec<u8>> {
    let cutoff = async move {
        match done.await {
            Ok(()) => time::sleep(grace).await,
            Err(_) => future::pending().await,
        }
    };
    tokio::pin!(cutoff);

    loop {
        select! {
            biased;
            n = reader.read_buf(&mut buffer) => {
                if n? == 0 {
                    return Ok(buffer);
                }
            }
            _ = &mut cutoff => {
                log::debug!("pipe still open {:?} after exit, stop draining", grace);
                return Ok(buffer);
            }
        }
    }
}
