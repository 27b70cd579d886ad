use chrono::Utc;
use cmdgate_core::{EffectHandler, HandlerError};
use cmdgate_store::MemoryStore;
use std::sync::Arc;

/// Merges one `key=value` pair into the memory document
///
/// Without an `=`, the whole parameter is stored under `data_<unix secs>`.
#[derive(Debug, Clone)]
pub struct UpdateMemoryEffect {
    memory: Arc<MemoryStore>,
}

impl UpdateMemoryEffect {
    pub fn new(memory: Arc<MemoryStore>) -> Self {
        Self { memory }
    }
}

impl EffectHandler for UpdateMemoryEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        let (key, value, result) = match parameter.split_once('=') {
            Some((key, value)) => {
                let (key, value) = (key.trim(), value.trim());
                (
                    key.to_string(),
                    value.to_string(),
                    format!("Memory updated: {} = {}", key, value),
                )
            }
            None => (
                format!("data_{}", Utc::now().timestamp()),
                parameter.to_string(),
                format!("Memory updated with data: {}", parameter),
            ),
        };

        self.memory
            .update(&key, &value)
            .map_err(|e| HandlerError::new(format!("Failed to update memory: {}", e.message())))?;
        Ok(result)
    }
}
