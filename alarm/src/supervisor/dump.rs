use serde::{Deserialize, Serialize};

/// When the captured output is copied to our own stdout
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DumpPolicy {
    #[value(name = "always")]
    Always,
    #[default]
    #[value(name = "onerror")]
    OnError,
    #[value(name = "onsuccess")]
    OnSuccess,
}

impl DumpPolicy {
    /// nothing is ever dumped unless some stream went to memory
    pub fn should_dump(&self, success: bool, captured: bool) -> bool {
        captured
            && match self {
                DumpPolicy::Always => true,
                DumpPolicy::OnError => !success,
                DumpPolicy::OnSuccess => success,
            }
    }
}
