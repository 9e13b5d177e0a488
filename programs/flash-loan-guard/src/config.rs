use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

use crate::{
    constants::*,
    error::{FlashGuardError, FlashGuardResult},
};

/// Parameters fixed when the engine is created
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    /// Seconds that must pass between two checkpoints of one account
    pub min_checkpoint_interval: i64,

    /// Slots that must pass between two checkpoints of one account
    pub min_slot_delta: u64,

    /// Maximum tolerated balance change between checkpoints, in percent
    pub max_balance_change_pct: u64,

    pub fee_numerator: u64,
    pub fee_denominator: u64,

    /// Upper bound on a single loan, in base units
    pub max_loan_amount: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_checkpoint_interval: MIN_CHECKPOINT_INTERVAL_SECS,
            min_slot_delta: MIN_SLOT_DELTA,
            max_balance_change_pct: MAX_BALANCE_CHANGE_PCT,
            fee_numerator: FLASH_LOAN_FEE_NUMERATOR,
            fee_denominator: FLASH_LOAN_FEE_DENOMINATOR,
            max_loan_amount: MAX_LOAN_AMOUNT,
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> FlashGuardResult<()> {
        if self.fee_denominator == 0 || self.fee_numerator >= self.fee_denominator {
            msg!(
                "Invalid fee ratio {}/{}",
                self.fee_numerator,
                self.fee_denominator
            );
            return Err(FlashGuardError::InvalidConfig);
        }

        if self.max_loan_amount == 0 {
            msg!("Max loan amount must be positive");
            return Err(FlashGuardError::InvalidConfig);
        }

        if self.min_checkpoint_interval < 0 {
            msg!("Negative checkpoint interval {}", self.min_checkpoint_interval);
            return Err(FlashGuardError::InvalidConfig);
        }

        Ok(())
    }
}
