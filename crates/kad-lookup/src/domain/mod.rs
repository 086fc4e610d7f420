//! Domain Layer - Pure lookup logic with no I/O
//!
//! This module contains:
//! - Node identifiers and the XOR distance metric
//! - Ranking and truncation of peer sets
//! - The iterative lookup state machine
//! - Protocol message shapes and error types

pub mod lookup;
pub mod services;
/// Core domain types (entities, values, messages, errors)
pub mod types;

pub use lookup::*;
pub use services::*;
pub use types::*;
