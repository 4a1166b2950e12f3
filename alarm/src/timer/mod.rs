//! Deadline specifications and the tasks that enforce them.
//!
//! A specification is a comma separated list of `delay[:signal]` segments,
//! e.g. `2,4:9` sends SIGTERM after two seconds and SIGKILL after four.
pub mod alarm;

use std::time::Duration;

pub use alarm::{arm, disarm, Alarm, Outcome};

pub const SECOND_IN_NS: f64 = 1_000_000_000.0;
pub const DEFAULT_SIGNAL: i32 = 15;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("Couldn't parse timer string '{0}': invalid delay")]
    Delay(String),
    #[error("Couldn't parse timer string '{0}': invalid signal")]
    Signal(String),
}

/// A single (delay, signal) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub delay: Duration,
    /// signal `0` only probes whether the process is still alive
    pub signal: i32,
}

impl TimerSpec {
    /// an expired-on-arrival timer, dropped before scheduling
    pub fn is_useless(&self) -> bool {
        self.delay.is_zero()
    }
    pub fn secs(&self) -> f64 {
        self.delay.as_secs_f64()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Parser {
    pub default_signal: i32,
    /// disable scaling of sub-second values up to nanoseconds
    pub force_raw: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            default_signal: DEFAULT_SIGNAL,
            force_raw: false,
        }
    }
}

impl Parser {
    /// Parse one `delay[:signal]` segment.
    ///
    /// Values smaller than one second worth of nanoseconds are read as
    /// seconds unless `force_raw` is set, so `5` and `5000000000` are the
    /// same deadline. Non-positive delays produce a useless timer rather
    /// than an error.
    pub fn parse(&self, segment: &str) -> Result<TimerSpec, Error> {
        log::debug!("Parsing timer: '{}'", segment);
        let (delay, signal) = match segment.split_once(':') {
            Some((delay, signal)) => (delay, Some(signal)),
            None => (segment, None),
        };

        let mut ticks: f64 = delay
            .trim()
            .parse()
            .map_err(|_| Error::Delay(segment.to_owned()))?;
        if !ticks.is_finite() {
            return Err(Error::Delay(segment.to_owned()));
        }

        let signal = match signal {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|sig| *sig >= 0)
                .ok_or_else(|| Error::Signal(segment.to_owned()))?,
            None => self.default_signal,
        };

        if ticks < SECOND_IN_NS && !self.force_raw {
            ticks *= SECOND_IN_NS;
        }
        let delay = match ticks > 0.0 {
            true => Duration::from_nanos(ticks as u64),
            false => Duration::ZERO,
        };

        Ok(TimerSpec { delay, signal })
    }
    /// Parse a whole comma separated specification.
    ///
    /// Any bad segment fails the whole list. Empty segments are skipped and
    /// useless timers are dropped.
    pub fn parse_list(&self, spec: &str) -> Result<Vec<TimerSpec>, Error> {
        let mut timers = Vec::new();
        for segment in spec.split(',').filter(|x| !x.trim().is_empty()) {
            let timer = self.parse(segment)?;
            match timer.is_useless() {
                true => log::debug!("WARN: Ignoring useless timer {}", segment),
                false => timers.push(timer),
            }
        }
        Ok(timers)
    }
}
