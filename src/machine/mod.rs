//! The pick/ban state machine and its errors.
//!
//! [`PickBanMachine`] is a plain value: it does no locking and no logging.
//! Sharing and concurrency live in [`crate::session`].

mod error;
#[allow(clippy::module_inception)]
mod machine;

pub use error::ActionError;
pub use machine::PickBanMachine;
