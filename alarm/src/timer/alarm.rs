use std::io;

use tokio::{task::JoinHandle, time};

use super::TimerSpec;

/// Result of one expired timer
#[derive(Debug)]
pub enum Outcome {
    /// nonzero signal was sent
    Delivered,
    /// the process was already gone, expected when racing normal exit
    Gone(io::Error),
    /// signal `0` found the process still running
    Alive,
}

/// A timer bound to a running process
#[derive(Debug, Clone, Copy)]
pub struct Alarm {
    spec: TimerSpec,
    pid: libc::pid_t,
}

impl Alarm {
    pub fn new(spec: TimerSpec, pid: u32) -> Self {
        Self {
            spec,
            pid: pid as libc::pid_t,
        }
    }
    /// send the signal now
    ///
    /// Failure is never escalated, it only shows up as [`Outcome::Gone`].
    pub fn fire(&self) -> Outcome {
        let ret = unsafe { libc::kill(self.pid, self.spec.signal) };
        let sent = match ret {
            0 => Ok(()),
            _ => Err(io::Error::last_os_error()),
        };
        match (self.spec.signal, sent) {
            (0, Ok(())) => {
                log::warn!("Pid {} : alive after {} seconds", self.pid, self.spec.secs());
                Outcome::Alive
            }
            (_, Ok(())) => {
                log::debug!("Pid {} : sent signal {}", self.pid, self.spec.signal);
                Outcome::Delivered
            }
            (_, Err(err)) => {
                log::debug!("Pid {} : Couldn't signal: {}", self.pid, err);
                Outcome::Gone(err)
            }
        }
    }
    /// sleep for the configured delay, measured from now, then fire
    pub async fn run(self) -> Outcome {
        log::debug!(
            "Pid {} : waiting for {} seconds to send {}",
            self.pid,
            self.spec.secs(),
            self.spec.signal
        );
        time::sleep(self.spec.delay).await;
        self.fire()
    }
}

/// Start one independent task per timer.
///
/// The tasks keep running until they fire or are passed to [`disarm`].
pub fn arm(pid: u32, timers: &[TimerSpec]) -> Vec<JoinHandle<Outcome>> {
    timers
        .iter()
        .filter(|spec| !spec.is_useless())
        .map(|spec| tokio::spawn(Alarm::new(*spec, pid).run()))
        .collect()
}

/// Cancel every timer that has not fired yet.
///
/// Must be called once the process is reaped, its pid may be reused.
pub fn disarm(alarms: &[JoinHandle<Outcome>]) {
    let pending = alarms.iter().filter(|alarm| !alarm.is_finished()).count();
    if pending > 0 {
        log::debug!("cancelling {} pending timers", pending);
    }
    alarms.iter().for_each(JoinHandle::abort);
}
