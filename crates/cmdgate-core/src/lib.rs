//! cmdgate Core - command grammar and dispatch primitives
//!
//! This crate provides the storage-agnostic pieces of the command gateway:
//! - The closed instruction set and the `KIND: parameter` parser
//! - Synonym/sugar normalization into handler slots
//! - The effect handler trait and registry
//! - Execution outcome model and restart signalling
//! - The canonical error and logging facilities shared by every crate

pub mod errors;
pub mod instruction;
pub mod logging_facility;
pub mod outcome;
pub mod policy;
pub mod registry;
pub mod restart;

/// Re-exported for the logging macros
pub use cmdgate_core_types as core_types;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, GatewayError, HandlerError, ParseError, RegistryError, Result};
pub use instruction::{parse, HandlerKind, Instruction, InstructionKind, RoutedInstruction};
pub use outcome::{ExecutionOutcome, InstructionState};
pub use policy::{AllowListModulePolicy, DenyAllModulePolicy, ModulePolicy};
pub use registry::{EffectHandler, EffectRegistry};
pub use restart::RestartSignal;
