//! Utility modules

pub mod logging;

pub use logging::{init_logger, try_init_logger};
