//! Builder API for ergonomic flow and session construction.
//!
//! This module provides fluent builders and the [`flow!`](crate::flow) macro
//! for declaring turn orders and starting sessions with minimal boilerplate.

pub mod error;
pub mod flow;
pub mod macros;
pub mod session;

pub use error::BuildError;
pub use flow::FlowBuilder;
pub use session::SessionBuilder;
