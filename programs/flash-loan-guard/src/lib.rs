// Flash loan safeguard engine
// Reentrancy guard, checkpoint/cooldown validator and loan executor over a
// single asset ledger

pub mod callback;
pub mod config;
pub mod constants;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod fees;
pub mod instruction;
pub mod processor;
pub mod security;
pub mod state;

pub use callback::{EngineHandle, FlashBorrower, FlashLoanTerms, NativeRecipient};
pub use config::GuardConfig;
pub use context::CallContext;
pub use engine::{FlashLoanEngine, LoanReceipt};
pub use error::{FlashGuardError, FlashGuardResult, ValidationFailure};
pub use processor::{Processor, ProgramRegistry};
