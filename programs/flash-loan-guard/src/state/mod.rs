pub mod checkpoint;
pub mod ledger;
pub mod pool;
pub mod reentrancy_lock;

pub use checkpoint::*;
pub use ledger::*;
pub use pool::*;
pub use reentrancy_lock::*;
