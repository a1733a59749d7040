pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod probe;
pub mod settings;

pub use error::{EcogenError, Result};
