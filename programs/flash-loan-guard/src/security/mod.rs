//! Guards that every state-changing entry point passes through

pub mod checkpoint_validator;
pub mod reentrancy_guard;

pub use checkpoint_validator::*;
pub use reentrancy_guard::*;
