//! Constants used throughout the crate
//!
//! This module centralizes default values, file names and log messages.

// Stored procedures
pub const DEFAULT_PROCEDURE_SCHEMA: &str = "dbo";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 86_400;

// Database
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

// Configuration files
pub const APP_DIR_NAME: &str = "repobase";
pub const LOCAL_CONFIG_FILE: &str = "repobase.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "repobase.log";
pub const CONFIG_GENERATED: &str = "Configuration file generated";

// Log Messages
pub const LOG_CONNECTED: &str = "Connected to database";
pub const LOG_CONNECTION_CLOSED: &str = "Database connection closed";
