/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

pub use settings::{AppConfig, MetricsConfig, StoreConfig, load_config, load_default_config};
