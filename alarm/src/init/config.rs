use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{supervisor::DumpPolicy, timer::DEFAULT_SIGNAL};

/// environment variable naming the settings file
pub static CONFIG_PATH_ENV: &str = "ALARM_CONFIG";

fn default_log() -> u8 {
    3
}

fn default_signal() -> i32 {
    DEFAULT_SIGNAL
}

fn default_memory() -> usize {
    8
}

fn default_drain_grace() -> u64 {
    100
}

/// Defaults read from the optional settings file
///
/// Command line flags take precedence over every value here.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_log")]
    pub log_level: u8,
    #[serde(default = "default_signal")]
    pub default_signal: i32,
    /// capacity hint of the memory sink in KB
    #[serde(default = "default_memory")]
    pub memory: usize,
    #[serde(default)]
    pub dump: DumpPolicy,
    /// how long to keep draining captured output after the child exited
    #[serde(default = "default_drain_grace")]
    pub drain_grace_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log(),
            default_signal: default_signal(),
            memory: default_memory(),
            dump: Default::default(),
            drain_grace_ms: default_drain_grace(),
        }
    }
}

fn try_load_config(config_path: impl AsRef<Path>) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut file = File::open(config_path.as_ref())?;
    let mut buf = String::new();
    file.read_to_string(&mut buf)?;
    Ok(toml::from_str(buf.as_str())?)
}

/// Load settings from `$ALARM_CONFIG`.
///
/// Returns the defaults and the reason when the file is set but unusable,
/// the logger is not up yet so reporting is left to the caller.
pub fn load() -> (Settings, Option<String>) {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => load_from(PathBuf::from(path)),
        None => (Settings::default(), None),
    }
}

pub fn load_from(path: PathBuf) -> (Settings, Option<String>) {
    match try_load_config(&path) {
        Ok(settings) => (settings, None),
        Err(err) => (
            Settings::default(),
            Some(format!("Unable to load {}: {}", path.display(), err)),
        ),
    }
}
