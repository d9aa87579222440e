mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{AppConfig, GroupingConfig, LogConfig, MessagesConfig, TypingConfig};
pub use loader::load;
