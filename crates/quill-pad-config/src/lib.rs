/// Application configuration loading and persistence.
pub mod config;

pub use config::{config_path, AppConfig};
