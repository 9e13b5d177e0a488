//! Fixed parameters of the flash loan guard

/// Base units per whole asset unit (9 decimals)
pub const UNIT: u64 = 1_000_000_000;

/// Minimum wall-clock gap between two checkpoints (30 minutes)
pub const MIN_CHECKPOINT_INTERVAL_SECS: i64 = 30 * 60;

/// Minimum slot gap between two checkpoints
pub const MIN_SLOT_DELTA: u64 = 10;

/// Largest balance swing tolerated between checkpoints, in percent
pub const MAX_BALANCE_CHANGE_PCT: u64 = 50;

/// Flash loan fee: 3 / 1000 = 0.3%
pub const FLASH_LOAN_FEE_NUMERATOR: u64 = 3;
pub const FLASH_LOAN_FEE_DENOMINATOR: u64 = 1_000;

/// Largest single loan (1000 whole units)
pub const MAX_LOAN_AMOUNT: u64 = 1_000 * UNIT;
