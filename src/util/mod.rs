//! Utility modules for wheelhouse
//!
//! Currently holds the structured logging setup.

pub mod logging;

// Re-export commonly used items
pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
