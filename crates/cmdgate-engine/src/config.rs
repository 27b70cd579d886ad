//! Gateway configuration
//!
//! Values come from an optional TOML file; every field has a default so an
//! empty or absent file yields a usable configuration. Relative file names
//! resolve under `data_dir`.

#![allow(clippy::result_large_err)]

use cmdgate_core::errors::{ExError, ExErrorKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub data_dir: PathBuf,
    pub queue_file: PathBuf,
    pub log_file: PathBuf,
    pub ingress_log_file: PathBuf,
    pub memory_file: PathBuf,
    /// Root for CREATE_FILE and MEMORY_BACKUP outputs
    pub workspace_dir: PathBuf,
    pub modules_dir: PathBuf,
    /// Modules RUN_MODULE may execute; empty denies all
    pub allowed_modules: Vec<String>,
    pub poll_interval_secs: u64,
    pub command_delay_ms: u64,
    pub restart_delay_secs: u64,
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".cmdgate"),
            queue_file: PathBuf::from("commands.json"),
            log_file: PathBuf::from("execution_log.jsonl"),
            ingress_log_file: PathBuf::from("ingress_log.jsonl"),
            memory_file: PathBuf::from("memory.json"),
            workspace_dir: PathBuf::from("workspace"),
            modules_dir: PathBuf::from("modules"),
            allowed_modules: Vec::new(),
            poll_interval_secs: 5,
            command_delay_ms: 500,
            restart_delay_secs: 3,
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load from a TOML file, or defaults when `path` is `None`
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Io` if the file cannot be read and
    /// `ExErrorKind::InvalidInput` if it is not valid TOML for this schema.
    pub fn load(path: Option<&Path>) -> Result<Self, ExError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    ExError::new(ExErrorKind::Io)
                        .with_op("load_config")
                        .with_message(format!("{}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&raw)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidInput` on malformed TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, ExError> {
        toml::from_str(raw).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Defaults rooted at `data_dir`, with no delays; used by tests and tools
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            poll_interval_secs: 0,
            command_delay_ms: 0,
            restart_delay_secs: 0,
            ..Self::default()
        }
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn queue_path(&self) -> PathBuf {
        self.resolve(&self.queue_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    pub fn ingress_log_path(&self) -> PathBuf {
        self.resolve(&self.ingress_log_file)
    }

    pub fn memory_path(&self) -> PathBuf {
        self.resolve(&self.memory_file)
    }

    pub fn workspace_path(&self) -> PathBuf {
        self.resolve(&self.workspace_dir)
    }

    pub fn modules_path(&self) -> PathBuf {
        self.resolve(&self.modules_dir)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();

        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.command_delay(), Duration::from_millis(500));
        assert_eq!(config.restart_delay(), Duration::from_secs(3));
        assert_eq!(config.bind, "0.0.0.0:5000");
        assert!(config.allowed_modules.is_empty());
        assert_eq!(config.queue_path(), PathBuf::from(".cmdgate/commands.json"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = GatewayConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/cmdgate"
            poll_interval_secs = 1
            allowed_modules = ["report"]
            "#,
        )
        .unwrap();

        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.command_delay_ms, 500);
        assert_eq!(config.allowed_modules, vec!["report".to_string()]);
        assert_eq!(
            config.memory_path(),
            PathBuf::from("/var/lib/cmdgate/memory.json")
        );
    }

    #[test]
    fn test_absolute_file_is_not_rebased() {
        let config = GatewayConfig::from_toml_str(r#"log_file = "/tmp/exec.jsonl""#).unwrap();
        assert_eq!(config.log_path(), PathBuf::from("/tmp/exec.jsonl"));
    }

    #[test]
    fn test_malformed_toml_is_invalid_input() {
        let err = GatewayConfig::from_toml_str("poll_interval_secs = \"soon\"").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GatewayConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
