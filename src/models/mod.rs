pub mod app_config;
pub mod error;
pub mod oauth;

pub use app_config::{AppConfig, AppState, ConfigError};
pub use error::FlowError;
