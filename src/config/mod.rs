pub mod loader;
pub mod types;

pub use types::{EcogenConfig, PathsConfig, ProbeConfig, TunnelConfig};
