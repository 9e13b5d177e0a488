//! Checkpoint/Cooldown Validator
//!
//! Rate-limits state-changing calls per account and refuses calls that arrive
//! after the observed balance has swung too far since the account's last
//! checkpoint. The balance it sees is the pre-operation balance: it runs
//! before the wrapped call mutates the ledger.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    config::GuardConfig,
    context::CallContext,
    error::{FlashGuardError, FlashGuardResult, ValidationFailure},
    state::{CheckpointStore, LastGuardedSlots, LoanCheckpoint},
};

/// Signed percentage change from `previous` to `current`, truncated toward
/// zero. Zero when there is no previous balance.
pub fn balance_change_pct(previous: u64, current: u64) -> i128 {
    if previous == 0 {
        return 0;
    }
    (current as i128 - previous as i128) * 100 / previous as i128
}

pub struct CheckpointValidator<'a> {
    config: &'a GuardConfig,
}

impl<'a> CheckpointValidator<'a> {
    pub fn new(config: &'a GuardConfig) -> Self {
        Self { config }
    }

    /// Runs the three timing checks and the balance-change check, then
    /// records the new checkpoint. Nothing is written when a check fails.
    pub fn validate_and_record(
        &self,
        checkpoints: &mut CheckpointStore,
        last_guarded: &mut LastGuardedSlots,
        ctx: &CallContext,
        current_balance: u64,
    ) -> FlashGuardResult<LoanCheckpoint> {
        let account = &ctx.caller;
        let previous = checkpoints.get(account);

        self.check_timing(account, &previous, last_guarded.get(account), ctx)?;

        let change = balance_change_pct(previous.balance, current_balance);
        if change.unsigned_abs() > self.config.max_balance_change_pct as u128 {
            msg!(
                "Balance change {}% for {} exceeds {}% ({} -> {})",
                change,
                account,
                self.config.max_balance_change_pct,
                previous.balance,
                current_balance
            );
            return Err(ValidationFailure::ExcessiveBalanceChange.into());
        }

        let checkpoint = LoanCheckpoint {
            balance: current_balance,
            timestamp: ctx.unix_timestamp,
            slot: ctx.slot,
        };
        checkpoints.record(account, checkpoint);
        last_guarded.record(account, ctx.slot);

        msg!(
            "Checkpoint for {}: balance {}, slot {}, change {}%",
            account,
            current_balance,
            ctx.slot,
            change
        );
        Ok(checkpoint)
    }

    fn check_timing(
        &self,
        account: &Pubkey,
        previous: &LoanCheckpoint,
        last_guarded_slot: u64,
        ctx: &CallContext,
    ) -> FlashGuardResult<()> {
        if ctx.slot <= last_guarded_slot {
            msg!(
                "Cooldown active for {}: slot {} <= last guarded slot {}",
                account,
                ctx.slot,
                last_guarded_slot
            );
            return Err(ValidationFailure::CooldownActive.into());
        }

        let earliest_time = previous
            .timestamp
            .checked_add(self.config.min_checkpoint_interval)
            .ok_or(FlashGuardError::ArithmeticOverflow)?;
        if ctx.unix_timestamp < earliest_time {
            msg!(
                "Checkpoint interval too short for {}: now {}, earliest {}",
                account,
                ctx.unix_timestamp,
                earliest_time
            );
            return Err(ValidationFailure::IntervalTooShort.into());
        }

        let earliest_slot = previous
            .slot
            .checked_add(self.config.min_slot_delta)
            .ok_or(FlashGuardError::ArithmeticOverflow)?;
        if ctx.slot < earliest_slot {
            msg!(
                "Checkpoint slot delta too short for {}: slot {}, earliest {}",
                account,
                ctx.slot,
                earliest_slot
            );
            return Err(ValidationFailure::HeightTooShort.into());
        }

        Ok(())
    }
}
