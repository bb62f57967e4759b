//! Tracer configuration.
//!
//! [`TracerConfig`] carries the workspace root used to decide which source
//! files are traced, the path markers that identify library install areas,
//! and the bound applied to every serialized value.

use crate::error::{Result, TracerError};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable that overrides the workspace root.
pub const WORKSPACE_ENV_VAR: &str = "TRACEBUSTER_WORKSPACE";

/// Environment variable that overrides the maximum serialized value length.
pub const MAX_VALUE_LEN_ENV_VAR: &str = "TRACEBUSTER_MAX_VALUE_LEN";

/// Default maximum length, in characters, of one serialized value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 1000;

/// Path component sequences that mark third-party or toolchain sources.
pub const DEFAULT_LIBRARY_MARKERS: &[&str] = &[
    ".cargo/registry",
    ".cargo/git",
    ".rustup/toolchains",
    "rustc",
    "vendor",
];

static STARTUP_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Record the current directory as the startup directory.
///
/// The startup directory is captured the first time it is needed: by this
/// function, [`TracerConfig::from_env`], or the first [`TracerConfig::new`].
/// Hosts that change directory before tracing should call this first thing
/// in `main`. Later calls have no effect.
pub fn capture_startup_dir() -> Option<PathBuf> {
    STARTUP_DIR.get_or_init(|| std::env::current_dir().ok()).clone()
}

/// The current directory as first observed by this process.
///
/// Relative `file!()` paths are relative to this directory (where cargo
/// invoked the compiler).
pub fn startup_dir() -> Result<PathBuf> {
    match capture_startup_dir() {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracerConfig {
    /// Only source files under this directory are traced.
    pub workspace_root: PathBuf,
    /// Paths containing any of these component sequences are never traced.
    pub library_markers: Vec<String>,
    /// Serialized values longer than this are truncated.
    pub max_value_len: usize,
    /// Directory relative source paths are resolved against.
    pub source_base: PathBuf,
}

impl TracerConfig {
    /// Create a configuration rooted at `workspace_root` with default markers.
    ///
    /// Relative source paths resolve against the startup directory, falling
    /// back to the workspace root when the directory cannot be read.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        let source_base = capture_startup_dir().unwrap_or_else(|| workspace_root.clone());
        Self {
            workspace_root,
            library_markers: DEFAULT_LIBRARY_MARKERS.iter().map(|m| m.to_string()).collect(),
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            source_base,
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// The workspace root comes from `TRACEBUSTER_WORKSPACE` when set, and
    /// otherwise from the directory the process started in. The value bound
    /// comes from `TRACEBUSTER_MAX_VALUE_LEN` when set.
    pub fn from_env() -> Result<Self> {
        let root = match std::env::var_os(WORKSPACE_ENV_VAR) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => startup_dir()?,
        };

        let mut config = Self::new(root);

        if let Ok(raw) = std::env::var(MAX_VALUE_LEN_ENV_VAR) {
            config.max_value_len = parse_max_value_len(&raw)?;
        }

        Ok(config)
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn with_library_marker(mut self, marker: impl Into<String>) -> Self {
        self.library_markers.push(marker.into());
        self
    }

    pub fn with_max_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len.max(1);
        self
    }

    pub fn with_source_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.source_base = base.into();
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

fn parse_max_value_len(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(TracerError::ConfigError(format!(
            "{} must be greater than zero",
            MAX_VALUE_LEN_ENV_VAR
        ))),
        Ok(len) => Ok(len),
        Err(e) => Err(TracerError::ConfigError(format!(
            "{} is not a valid length ({:?}): {}",
            MAX_VALUE_LEN_ENV_VAR, raw, e
        ))),
    }
}
