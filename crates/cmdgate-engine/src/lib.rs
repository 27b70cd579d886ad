//! cmdgate Engine - orchestration layer
//!
//! Wires the core grammar and the file-backed stores into the two actors of
//! the gateway: the [`IngressGateway`] that accepts commands and the
//! [`Dispatcher`] that drains and executes them.

pub mod config;
pub mod dispatcher;
pub mod effects;
pub mod gateway;
pub mod runtime;

pub use config::GatewayConfig;
pub use dispatcher::{CycleReport, Dispatcher, RunExit, RunOptions};
pub use gateway::{GatewayStatus, IngressGateway, Submission};
pub use runtime::Runtime;
