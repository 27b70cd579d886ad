use super::confined_path;
use chrono::Utc;
use cmdgate_core::{EffectHandler, HandlerError};
use cmdgate_store::document::write_pretty;
use cmdgate_store::{MemoryMap, MemoryStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct MemoryBackup<'a> {
    timestamp: String,
    backup_type: &'static str,
    data: &'a MemoryMap,
}

/// Writes a full copy of the memory document under the workspace directory
#[derive(Debug, Clone)]
pub struct MemoryBackupEffect {
    memory: Arc<MemoryStore>,
    workspace_dir: PathBuf,
}

impl MemoryBackupEffect {
    pub fn new(memory: Arc<MemoryStore>, workspace_dir: PathBuf) -> Self {
        Self {
            memory,
            workspace_dir,
        }
    }
}

impl EffectHandler for MemoryBackupEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        let now = Utc::now();
        let name = if parameter.is_empty() {
            format!("memory_backup_{}.json", now.timestamp())
        } else {
            parameter.to_string()
        };
        let target = confined_path(&self.workspace_dir, &name)?;

        let data = self.memory.snapshot();
        let backup = MemoryBackup {
            timestamp: now.to_rfc3339(),
            backup_type: "full_memory",
            data: &data,
        };
        write_pretty(&target, &backup)
            .map_err(|e| HandlerError::new(format!("Memory backup failed: {}", e.message())))?;

        Ok(format!("Memory backup saved to {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_backup_contains_memory() {
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(MemoryStore::new(dir.path().join("memory.json")));
        memory.update("operational_mode", "fast").unwrap();
        let effect = MemoryBackupEffect::new(Arc::clone(&memory), dir.path().join("workspace"));

        let result = effect.execute("snap.json").unwrap();

        assert_eq!(result, "Memory backup saved to snap.json");
        let raw = fs::read_to_string(dir.path().join("workspace/snap.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["backup_type"], "full_memory");
        assert_eq!(doc["data"]["operational_mode"], "fast");
        assert!(doc["timestamp"].is_string());
    }

    #[test]
    fn test_default_name() {
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(MemoryStore::new(dir.path().join("memory.json")));
        let effect = MemoryBackupEffect::new(memory, dir.path().join("workspace"));

        let result = effect.execute("").unwrap();

        let name = result.trim_start_matches("Memory backup saved to ");
        assert!(name.starts_with("memory_backup_"));
        assert!(name.ends_with(".json"));
        assert!(dir.path().join("workspace").join(name).exists());
    }

    #[test]
    fn test_rejects_absolute_target() {
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(MemoryStore::new(dir.path().join("memory.json")));
        let effect = MemoryBackupEffect::new(memory, dir.path().join("workspace"));

        assert!(effect.execute("/tmp/stolen.json").is_err());
    }
}
