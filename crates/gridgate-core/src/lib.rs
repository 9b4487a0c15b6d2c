//! # gridgate-core
//!
//! Shared configuration types for the Gridgate portal.
//!
//! Configuration is loaded once at startup from a TOML file and handed
//! by reference to the components that need it (token signer, sync
//! client, server). No component reads the environment at call time;
//! the only environment indirection is the explicit
//! `shared_secret_env` lookup resolved during load.

pub mod config;

pub use config::{
    load_config, load_config_from, ConfigError, GridgateConfig, ServerConfig, SyncConfig,
    WidgetConfig,
};
