/// Environment-backed configuration.
pub mod config;
