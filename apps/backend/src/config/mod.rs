pub mod app;

pub use app::{load_env_file, AppConfig, LlmConfig};
