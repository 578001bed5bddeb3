pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod replicate;
pub mod server;

pub use error::{Error, Result};
