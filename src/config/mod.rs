//! Configuration module.
//!
//! Handles DSL separators, pagination limits, the database path and model
//! descriptors, loaded from TOML with environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, DslSettings, PaginationSettings, Settings, SettingsError,
};
