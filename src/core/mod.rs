//! Core configuration and environment types.

pub mod config;
pub mod env;

pub use config::BenchConfig;
pub use env::EnvironmentInfo;
