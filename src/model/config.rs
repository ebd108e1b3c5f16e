use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub day: DayConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    /// Hour (0-23) at which a new day begins. Before it, "today" is still
    /// yesterday.
    #[serde(default = "default_new_day_start")]
    pub new_day_start: u32,
    /// Target number of completions per day; scales urgency growth
    #[serde(default = "default_todos_per_day")]
    pub todos_per_day: u32,
}

impl Default for DayConfig {
    fn default() -> Self {
        DayConfig {
            new_day_start: default_new_day_start(),
            todos_per_day: default_todos_per_day(),
        }
    }
}

fn default_new_day_start() -> u32 {
    4
}

fn default_todos_per_day() -> u32 {
    1
}

/// The remembered source list (session restore only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex overrides for the TUI chrome, e.g. `text = "#B0AAFF"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
