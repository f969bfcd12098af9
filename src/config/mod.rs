pub mod constants;
pub mod lib;
pub mod models;
pub mod validation;

pub use lib::{ConfigError, apply_env_overrides, load_config, parse_config};
