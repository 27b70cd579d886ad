//! Core types shared across cmdgate facilities
//!
//! This crate provides foundational types used by the error, logging and
//! ingress layers:
//!
//! - **Correlation types**: RequestId, CycleId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{CycleId, RequestId};
