//! Iterative lookup state machine.
//!
//! Pure bookkeeping for the alpha-bounded breadth-first expansion. The async
//! coordinator in `service::lookup` owns one of these per lookup and is the
//! only thing that mutates it.

mod state;

pub use state::{LookupState, LookupStats};
