//! Request-scoped middleware shared by all inbound adapters.

pub mod trace;

pub use trace::{Trace, TraceId};
