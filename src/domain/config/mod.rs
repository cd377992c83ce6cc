//! Configuration domain objects

pub mod app_config;
pub mod service_config;

pub use app_config::AppConfig;
pub use service_config::ServiceConfig;
