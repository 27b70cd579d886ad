use super::confined_path;
use chrono::Utc;
use cmdgate_core::{EffectHandler, HandlerError};
use std::fs;
use std::path::PathBuf;

/// Creates a templated text file under the workspace directory
#[derive(Debug, Clone)]
pub struct CreateFileEffect {
    workspace_dir: PathBuf,
}

impl CreateFileEffect {
    pub fn new(workspace_dir: PathBuf) -> Self {
        Self { workspace_dir }
    }

    fn render(name: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "# File created by cmdgate\n\
             # Timestamp: {timestamp}\n\
             # Filename: {name}\n\
             \n\
             This file was created by a CREATE_FILE command.\n\
             You can modify this content as needed.\n\
             \n\
             ---\n\
             Created: {timestamp}\n\
             Command: CREATE_FILE\n\
             Parameter: {name}\n"
        )
    }
}

impl EffectHandler for CreateFileEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        let target = confined_path(&self.workspace_dir, parameter)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HandlerError::new(format!("Failed to create file: {}", e)))?;
        }
        fs::write(&target, Self::render(parameter))
            .map_err(|e| HandlerError::new(format!("Failed to create file: {}", e)))?;

        Ok(format!("File '{}' created successfully", parameter))
    }
}
