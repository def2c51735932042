mod config;
mod repository;
mod service_provider;

pub use config::{build_config, DeskConfig, HostConfig, SheetsConfig};
pub use service_provider::ServiceProvider;
