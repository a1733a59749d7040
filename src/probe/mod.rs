//! Host probing: where the interpreter lives and whether a sandbox launcher exists.

mod host;
mod interpreter;
mod sandbox;

pub use host::{resolve_first, Host, Strategy, SystemHost};
pub use interpreter::{interpreter_strategies, resolve_interpreter, InterpreterPath};
pub use sandbox::{probe_sandbox, SandboxProbe};

#[cfg(test)]
pub use host::StaticHost;
