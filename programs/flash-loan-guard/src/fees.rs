//! Flash loan fee
//!
//! Fee is `floor(amount * numerator / denominator)`, 0.3% with the default
//! configuration.

use solana_program::msg;

use crate::{
    config::GuardConfig,
    error::{FlashGuardError, FlashGuardResult},
};

/// Fee owed on a loan of `amount`
pub fn flash_loan_fee(config: &GuardConfig, amount: u64) -> FlashGuardResult<u64> {
    let fee = amount
        .checked_mul(config.fee_numerator)
        .ok_or(FlashGuardError::ArithmeticOverflow)?
        .checked_div(config.fee_denominator)
        .ok_or(FlashGuardError::ArithmeticOverflow)?;
    Ok(fee)
}

/// Balance the pool must hold again once the borrower returns
pub fn repayment_due(config: &GuardConfig, initial_balance: u64, amount: u64) -> FlashGuardResult<u64> {
    let fee = flash_loan_fee(config, amount)?;
    initial_balance
        .checked_add(fee)
        .ok_or(FlashGuardError::ArithmeticOverflow)
}

/// Verify the pool got back at least what it handed out plus the fee
pub fn verify_flash_loan_repayment(
    config: &GuardConfig,
    initial_balance: u64,
    amount: u64,
    balance_after: u64,
) -> FlashGuardResult<()> {
    let required = repayment_due(config, initial_balance, amount)?;

    if balance_after < required {
        msg!(
            "Insufficient flash loan repayment: balance {}, required {}",
            balance_after,
            required
        );
        return Err(FlashGuardError::RepaymentInsufficient);
    }

    Ok(())
}
