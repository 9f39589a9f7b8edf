//! Shared utilities for the ISAAC+ ballot core.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
