use serde::{Deserialize, Serialize};

use crate::core::WhenClauseMode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub commands: CommandSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSettings {
    #[serde(default)]
    pub when_clause_mode: WhenClauseMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

fn default_log_file_name() -> String {
    "notecmd.log".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: None,
            file_name: default_log_file_name(),
        }
    }
}
