use cmdgate_core::{log_op_start, EffectHandler, HandlerError, RestartSignal};

/// Raises the restart signal; the dispatcher acts on it after the cycle
#[derive(Debug, Clone)]
pub struct RestartEffect {
    signal: RestartSignal,
}

impl RestartEffect {
    pub fn new(signal: RestartSignal) -> Self {
        Self { signal }
    }
}

impl EffectHandler for RestartEffect {
    fn execute(&self, _parameter: &str) -> Result<String, HandlerError> {
        log_op_start!("restart_system");
        self.signal.request();
        Ok("System restart requested".to_string())
    }
}
