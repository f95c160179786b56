/// Database configuration and connection management
pub mod database;

/// Seeding the store from configuration
pub mod seed;

/// Application settings loaded from config.toml
pub mod settings;
