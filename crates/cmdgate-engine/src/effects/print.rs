use cmdgate_core::{EffectHandler, HandlerError};

/// Writes the message to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintEffect;

impl EffectHandler for PrintEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        println!("[PRINT] {}", parameter);
        Ok(format!("Message printed: {}", parameter))
    }
}
