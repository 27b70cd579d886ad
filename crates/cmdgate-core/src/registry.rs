//! Effect handler interface and the kind-to-handler table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{HandlerError, RegistryError};
use crate::instruction::{HandlerKind, RoutedInstruction};

/// A side effect triggered by one instruction kind
///
/// Handlers receive the routed parameter and return the human-readable
/// result text recorded in the execution log.
pub trait EffectHandler: Send + Sync {
    /// Perform the effect.
    ///
    /// # Errors
    ///
    /// Returns a `HandlerError` whose message becomes the result text of a
    /// failed outcome.
    fn execute(&self, parameter: &str) -> Result<String, HandlerError>;
}

impl<F> EffectHandler for F
where
    F: Fn(&str) -> Result<String, HandlerError> + Send + Sync,
{
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        self(parameter)
    }
}

/// Table of effect handlers keyed by handler slot
///
/// # Example
///
/// ```
/// use cmdgate_core::errors::HandlerError;
/// use cmdgate_core::instruction::{HandlerKind, Instruction};
/// use cmdgate_core::registry::EffectRegistry;
///
/// let registry = EffectRegistry::new().with(HandlerKind::Print, |p: &str| {
///     Ok::<_, HandlerError>(format!("Message printed: {}", p))
/// });
///
/// let routed = Instruction::parse("PRINT: hi").unwrap().route();
/// assert_eq!(registry.execute(&routed).unwrap(), "Message printed: hi");
/// ```
#[derive(Clone, Default)]
pub struct EffectRegistry {
    handlers: BTreeMap<HandlerKind, Arc<dyn EffectHandler>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for a slot
    pub fn register(&mut self, kind: HandlerKind, handler: impl EffectHandler + 'static) {
        self.handlers.insert(kind, Arc::new(handler));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, kind: HandlerKind, handler: impl EffectHandler + 'static) -> Self {
        self.register(kind, handler);
        self
    }

    pub fn contains(&self, kind: HandlerKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered slots in stable order
    pub fn kinds(&self) -> Vec<HandlerKind> {
        self.handlers.keys().copied().collect()
    }

    /// Run the handler for a routed instruction
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NoHandler` when the slot is empty, or
    /// `RegistryError::Handler` when the handler itself fails.
    pub fn execute(&self, routed: &RoutedInstruction) -> Result<String, RegistryError> {
        let handler = self
            .handlers
            .get(&routed.handler)
            .ok_or_else(|| RegistryError::NoHandler {
                kind: routed.handler.to_string(),
            })?;

        Ok(handler.execute(&routed.parameter)?)
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    fn echo(parameter: &str) -> Result<String, HandlerError> {
        Ok(format!("echo {}", parameter))
    }

    fn always_fails(_: &str) -> Result<String, HandlerError> {
        Err(HandlerError::new("boom"))
    }

    #[test]
    fn test_execute_routes_to_registered_handler() {
        let registry = EffectRegistry::new().with(HandlerKind::Print, echo);
        let routed = Instruction::parse("PRINT: hello").unwrap().route();

        assert_eq!(registry.execute(&routed), Ok("echo hello".to_string()));
    }

    #[test]
    fn test_missing_handler_is_typed_error() {
        let registry = EffectRegistry::new();
        let routed = Instruction::parse("LOAD_SCRIPT: boot.sh").unwrap().route();

        assert_eq!(
            registry.execute(&routed),
            Err(RegistryError::NoHandler {
                kind: "LOAD_SCRIPT".to_string()
            })
        );
    }

    #[test]
    fn test_handler_failure_is_propagated() {
        let registry = EffectRegistry::new().with(HandlerKind::RunModule, always_fails);
        let routed = Instruction::parse("RUN_MODULE: x").unwrap().route();

        let err = registry.execute(&routed).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_synonyms_hit_same_slot() {
        let registry = EffectRegistry::new().with(HandlerKind::Speak, echo);

        for raw in ["SPEAK_NOW: hi", "VOICE_SPEAK: hi"] {
            let routed = Instruction::parse(raw).unwrap().route();
            assert_eq!(registry.execute(&routed), Ok("echo hi".to_string()));
        }
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        let mut registry = EffectRegistry::new().with(HandlerKind::Print, always_fails);
        registry.register(HandlerKind::Print, echo);

        let routed = Instruction::parse("PRINT: again").unwrap().route();
        assert!(registry.execute(&routed).is_ok());
        assert_eq!(registry.kinds(), vec![HandlerKind::Print]);
    }
}
