pub mod components;
pub mod config;
pub mod logging;
pub mod rendering;

// Re-export all commonly used items for easy access
pub use components::*;
pub use config::ShaderBindings;
pub use logging::{init_logging, LoggingConfig};
pub use rendering::*;
