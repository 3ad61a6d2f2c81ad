//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file and
//! are deserialized directly. Adapter-specific config types are built from
//! them at wiring time.

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Ticket board credentials and column names
    pub board: FileBoardConfig,
    /// Chat model endpoint settings
    pub model: FileModelConfig,
    /// Local repository mirror settings
    pub repo: FileRepoConfig,
    /// Persona names and the reviewer tag
    pub agents: FileAgentsConfig,
    /// Clarification poll and board scan cadence
    pub poll: FilePollConfig,
}

/// Board configuration from TOML (`[board]` section)
///
/// # Example
///
/// ```toml
/// [board]
/// api_key = "..."
/// api_token = "..."
/// board_id = "abc123"
/// guidance_list = "IMPORTANT"
/// destination_list = "Doing"
/// processed_list = "Processed"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBoardConfig {
    pub api_key: String,
    pub api_token: String,
    pub board_id: String,
    /// Column whose tickets form the standing guidance digest
    pub guidance_list: String,
    /// Column that receives decomposed child tickets
    pub destination_list: String,
    /// Column that marks a parent ticket as already decomposed
    pub processed_list: String,
}

impl Default for FileBoardConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_token: String::new(),
            board_id: String::new(),
            guidance_list: "IMPORTANT".to_string(),
            destination_list: "Doing".to_string(),
            processed_list: "Processed".to_string(),
        }
    }
}

/// Chat model configuration from TOML (`[model]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// OpenAI-compatible endpoint base URL
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
        }
    }
}

/// Repository mirror configuration from TOML (`[repo]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRepoConfig {
    /// Path to the local clone; cloned from `remote_url` when absent
    pub path: String,
    pub remote_url: Option<String>,
    pub author_name: String,
    pub author_email: String,
    /// Access token for authenticated push/pull
    pub token: Option<String>,
}

impl Default for FileRepoConfig {
    fn default() -> Self {
        Self {
            path: "./mirror".to_string(),
            remote_url: None,
            author_name: "Crewboard".to_string(),
            author_email: "crewboard@localhost".to_string(),
            token: None,
        }
    }
}

/// Persona configuration from TOML (`[agents]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub manager_name: String,
    pub developer_name: String,
    /// Persona that clarification questions are addressed to
    pub reviewer_name: String,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            manager_name: "EngManager".to_string(),
            developer_name: "Developer".to_string(),
            reviewer_name: "Reviewer".to_string(),
        }
    }
}

/// Poll cadence from TOML (`[poll]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollConfig {
    /// Seconds between clarification reply reads
    pub interval_secs: u64,
    /// Maximum number of reply reads before giving up
    pub max_attempts: u32,
    /// Seconds between board assignment scans
    pub scan_interval_secs: u64,
}

impl Default for FilePollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            max_attempts: 100,
            scan_interval_secs: 60,
        }
    }
}
