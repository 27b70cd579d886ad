use cmdgate_core::{EffectHandler, HandlerError};

/// Acknowledges `LOAD_SCRIPT` without running anything
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadScriptEffect;

impl EffectHandler for LoadScriptEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        tracing::debug!(script = parameter, "script loading is not supported");
        Ok("Command LOAD_SCRIPT recognized but not implemented yet".to_string())
    }
}
