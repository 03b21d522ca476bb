pub mod config;
pub mod env_diff;
pub mod id;
pub mod manifest;
