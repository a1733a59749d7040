//! PM2 process descriptors and the ecosystem file that holds them.

mod assemble;
mod paths;
mod writer;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{EcogenError, Result};

pub use assemble::{assemble, tunnel_args, AssemblyOptions, Environment};
pub use paths::{ensure_data_dir, executable_dir, HostPaths, OUTPUT_FILE_NAME};
pub use writer::{render, write_descriptor_set};

/// How PM2 should start the `script`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterMode {
    /// Execute the binary directly (`interpreter: "none"`)
    NativeBinary,
    /// Run the script through the named interpreter
    Interpreted(String),
}

impl Serialize for InterpreterMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::NativeBinary => serializer.serialize_str("none"),
            Self::Interpreted(interpreter) => serializer.serialize_str(interpreter),
        }
    }
}

/// One managed process. Field order is the key order in the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessDescriptor {
    pub name: String,
    #[serde(rename = "script")]
    pub command: PathBuf,
    pub args: Vec<String>,
    #[serde(rename = "cwd", skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    #[serde(rename = "interpreter")]
    pub interpreter_mode: InterpreterMode,
    #[serde(rename = "autorestart")]
    pub auto_restart: bool,
    #[serde(rename = "restart_delay")]
    pub restart_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_restarts: Option<u32>,
    #[serde(rename = "env", skip_serializing_if = "BTreeMap::is_empty")]
    pub env_overrides: BTreeMap<String, String>,
}

impl ProcessDescriptor {
    /// A native binary with auto-restart and no other settings.
    pub fn native(name: &str, command: impl Into<PathBuf>, restart_delay_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            command: command.into(),
            args: Vec::new(),
            working_directory: None,
            interpreter_mode: InterpreterMode::NativeBinary,
            auto_restart: true,
            restart_delay_ms,
            max_restarts: None,
            env_overrides: BTreeMap::new(),
        }
    }

    /// Run the original invocation as a sub-invocation of `launcher`.
    ///
    /// `script` becomes the launcher and `args` become `[old script, old args...]`.
    pub fn wrap_with(&mut self, launcher: &Path, interpreter: &str) {
        let original = std::mem::replace(&mut self.command, launcher.to_path_buf());
        self.args.insert(0, original.display().to_string());
        self.interpreter_mode = InterpreterMode::Interpreted(interpreter.to_string());
    }
}

/// Root of the ecosystem file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescriptorSet {
    #[serde(rename = "apps")]
    pub processes: Vec<ProcessDescriptor>,
}

impl DescriptorSet {
    pub fn get(&self, name: &str) -> Option<&ProcessDescriptor> {
        self.processes.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.processes.iter().map(|p| p.name.as_str()).collect()
    }

    /// Process names must be unique and every path must be representable in JSON.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for process in &self.processes {
            if !seen.insert(process.name.as_str()) {
                return Err(EcogenError::DuplicateProcess {
                    name: process.name.clone(),
                });
            }
            let paths = std::iter::once(&process.command).chain(&process.working_directory);
            for path in paths {
                if path.to_str().is_none() {
                    return Err(EcogenError::NonUtf8Path {
                        process: process.name.clone(),
                        path: path.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
