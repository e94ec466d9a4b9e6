/// Database connection and table bootstrap
pub mod database;

/// Application settings from catalog.toml and the environment
pub mod settings;
