pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use config::AppConfig;
pub use core::context::ServiceContext;
pub use utils::error::{ErrorKind, PredictError, Result};
