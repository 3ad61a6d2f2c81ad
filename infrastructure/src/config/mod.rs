//! Configuration loading and raw TOML data types

mod file_config;
mod loader;

pub use file_config::{
    FileAgentsConfig, FileBoardConfig, FileConfig, FileModelConfig, FilePollConfig,
    FileRepoConfig,
};
pub use loader::ConfigLoader;
