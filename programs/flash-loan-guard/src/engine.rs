//! Flash loan engine
//!
//! Ties the reentrancy guard, the checkpoint validator and the asset ledger
//! together. Every public entry point is atomic: the pool state and the event
//! log are restored if the call fails, so no partial effect is ever visible.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    callback::{EngineHandle, FlashBorrower, FlashLoanTerms, NativeRecipient},
    config::GuardConfig,
    context::CallContext,
    error::{FlashGuardError, FlashGuardResult},
    events::{
        Deposited, Event, FlashGuardEvent, LoanExecuted, NativeFunded, NativeTransferred, Repaid,
        Withdrawn,
    },
    fees::{flash_loan_fee, verify_flash_loan_repayment},
    security::{with_reentrancy_guard, CheckpointValidator, HasReentrancyLocks, ReentrancyGuard},
    state::{LoanCheckpoint, PoolState, PoolStats, ReentrancyLocks},
};

/// Outcome of a successful flash loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanReceipt {
    pub fee: u64,
    pub initial_balance: u64,
    pub final_balance: u64,
}

#[derive(Debug, Clone)]
pub struct FlashLoanEngine {
    config: GuardConfig,
    state: PoolState,
    events: Vec<FlashGuardEvent>,
}

impl Default for FlashLoanEngine {
    fn default() -> Self {
        Self {
            config: GuardConfig::default(),
            state: PoolState::new(),
            events: Vec::new(),
        }
    }
}

impl HasReentrancyLocks for FlashLoanEngine {
    fn reentrancy_locks(&mut self) -> &mut ReentrancyLocks {
        &mut self.state.locks
    }
}

impl FlashLoanEngine {
    pub fn new(config: GuardConfig) -> FlashGuardResult<Self> {
        Self::from_state(config, PoolState::new())
    }

    /// Resume from previously packed pool state
    pub fn from_state(config: GuardConfig, state: PoolState) -> FlashGuardResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn into_state(self) -> PoolState {
        self.state
    }

    pub fn available(&self, asset: &Pubkey) -> u64 {
        self.state.ledger.available(asset)
    }

    pub fn native_balance(&self) -> u64 {
        self.state.native_lamports
    }

    pub fn checkpoint(&self, account: &Pubkey) -> LoanCheckpoint {
        self.state.checkpoints.get(account)
    }

    pub fn last_guarded_slot(&self, account: &Pubkey) -> u64 {
        self.state.last_guarded.get(account)
    }

    pub fn is_locked(&self, account: &Pubkey) -> bool {
        self.state.locks.is_entered(account)
    }

    pub fn stats(&self) -> &PoolStats {
        &self.state.stats
    }

    pub fn events(&self) -> &[FlashGuardEvent] {
        &self.events
    }

    /// Hand committed events to the host. Call between top-level calls only.
    pub fn drain_events(&mut self) -> Vec<FlashGuardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Credit `amount` of `asset` to the pool
    pub fn deposit(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.atomically(|engine| {
            ReentrancyGuard::ensure_not_entered(&engine.state.locks, &ctx.caller)?;

            if amount == 0 {
                msg!("Deposit amount must be positive");
                return Err(FlashGuardError::InvalidAmount);
            }

            engine.validate_checkpoint(ctx, asset)?;

            let new_balance = engine.state.ledger.credit(asset, amount)?;
            engine.state.stats.deposits = engine.state.stats.deposits.saturating_add(1);

            engine.record(Deposited {
                account: ctx.caller,
                asset: *asset,
                amount,
                new_balance,
            });
            Ok(new_balance)
        })
    }

    /// Debit `amount` of `asset` from the pool
    pub fn withdraw(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.atomically(|engine| {
            ReentrancyGuard::ensure_not_entered(&engine.state.locks, &ctx.caller)?;

            if amount == 0 {
                msg!("Withdraw amount must be positive");
                return Err(FlashGuardError::InvalidAmount);
            }

            let available = engine.available(asset);
            if available < amount {
                msg!("Withdraw of {} exceeds available {}", amount, available);
                return Err(FlashGuardError::InsufficientLiquidity);
            }

            engine.validate_checkpoint(ctx, asset)?;

            let new_balance = engine.state.ledger.debit(asset, amount)?;
            engine.state.stats.withdrawals = engine.state.stats.withdrawals.saturating_add(1);

            engine.record(Withdrawn {
                account: ctx.caller,
                asset: *asset,
                amount,
                new_balance,
            });
            Ok(new_balance)
        })
    }

    /// Lend `amount` of `asset` to `borrower` for the duration of its callback.
    /// The whole asset balance is handed out and must come back with the fee.
    pub fn execute_flash_loan(
        &mut self,
        ctx: &CallContext,
        borrower: &mut dyn FlashBorrower,
        asset: &Pubkey,
        amount: u64,
        data: &[u8],
    ) -> FlashGuardResult<LoanReceipt> {
        self.atomically(|engine| {
            with_reentrancy_guard(engine, &ctx.caller, |engine| {
                engine.run_flash_loan(ctx, borrower, asset, amount, data)
            })
        })
    }

    /// Pay `amount` of `asset` into the pool without going through the
    /// guards. This is how a borrower hands funds back during its callback.
    pub fn repay(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.atomically(|engine| {
            if amount == 0 {
                return Err(FlashGuardError::InvalidAmount);
            }

            let new_balance = engine.state.ledger.credit(asset, amount)?;
            engine.record(Repaid {
                payer: ctx.caller,
                asset: *asset,
                amount,
                new_balance,
            });
            Ok(new_balance)
        })
    }

    /// Add to the pool's own native balance
    pub fn fund_native(&mut self, ctx: &CallContext, amount: u64) -> FlashGuardResult<u64> {
        self.atomically(|engine| {
            if amount == 0 {
                return Err(FlashGuardError::InvalidAmount);
            }

            let new_balance = engine
                .state
                .native_lamports
                .checked_add(amount)
                .ok_or(FlashGuardError::ArithmeticOverflow)?;
            engine.state.native_lamports = new_balance;

            engine.record(NativeFunded {
                funder: ctx.caller,
                amount,
                new_balance,
            });
            Ok(new_balance)
        })
    }

    /// Send native currency from the pool to `recipient`
    pub fn transfer_native(
        &mut self,
        ctx: &CallContext,
        recipient: &mut dyn NativeRecipient,
        amount: u64,
    ) -> FlashGuardResult<()> {
        self.atomically(|engine| {
            with_reentrancy_guard(engine, &ctx.caller, |engine| {
                if amount == 0 {
                    msg!("Native transfer amount must be positive");
                    return Err(FlashGuardError::InvalidAmount);
                }

                if amount > engine.state.native_lamports {
                    msg!(
                        "Native transfer of {} exceeds pool balance {}",
                        amount,
                        engine.state.native_lamports
                    );
                    return Err(FlashGuardError::InsufficientLiquidity);
                }
                engine.state.native_lamports -= amount;

                let recipient_key = recipient.key();
                let mut handle = EngineHandle::new(engine);
                if let Err(err) = recipient.on_receive(&mut handle, ctx, amount) {
                    msg!("Recipient {} rejected native transfer: {}", recipient_key, err);
                    return Err(FlashGuardError::TransferFailed);
                }

                engine.state.stats.native_transfers =
                    engine.state.stats.native_transfers.saturating_add(1);
                engine.record(NativeTransferred {
                    sender: ctx.caller,
                    recipient: recipient_key,
                    amount,
                });
                Ok(())
            })
        })
    }

    fn run_flash_loan(
        &mut self,
        ctx: &CallContext,
        borrower: &mut dyn FlashBorrower,
        asset: &Pubkey,
        amount: u64,
        data: &[u8],
    ) -> FlashGuardResult<LoanReceipt> {
        msg!("Flash loan requested by {}: {} of {}", ctx.caller, amount, asset);

        self.validate_checkpoint(ctx, asset)?;

        if amount == 0 || amount > self.config.max_loan_amount {
            msg!(
                "Invalid flash loan amount {} (max {})",
                amount,
                self.config.max_loan_amount
            );
            return Err(FlashGuardError::InvalidAmount);
        }

        let available = self.available(asset);
        if available < amount {
            msg!("Flash loan of {} exceeds available {}", amount, available);
            return Err(FlashGuardError::InsufficientLiquidity);
        }

        let fee = flash_loan_fee(&self.config, amount)?;
        let initial_balance = self.state.ledger.zero(asset);
        let repayment_due = initial_balance
            .checked_add(fee)
            .ok_or(FlashGuardError::ArithmeticOverflow)?;

        let terms = FlashLoanTerms {
            borrower: ctx.caller,
            asset: *asset,
            amount,
            fee,
            disbursed: initial_balance,
            repayment_due,
        };

        let mut handle = EngineHandle::new(self);
        if let Err(err) = borrower.on_flash_loan(&mut handle, ctx, &terms, data) {
            msg!("Borrower callback failed: {}", err);
            return Err(FlashGuardError::CallbackExecutionFailed);
        }

        let final_balance = self.available(asset);
        verify_flash_loan_repayment(&self.config, initial_balance, amount, final_balance)?;

        let stats = &mut self.state.stats;
        stats.loans_executed = stats.loans_executed.saturating_add(1);
        stats.fees_collected = stats.fees_collected.saturating_add(fee);

        self.record(LoanExecuted {
            borrower: ctx.caller,
            asset: *asset,
            amount,
            fee,
        });

        Ok(LoanReceipt {
            fee,
            initial_balance,
            final_balance,
        })
    }

    fn validate_checkpoint(&mut self, ctx: &CallContext, asset: &Pubkey) -> FlashGuardResult<LoanCheckpoint> {
        let current_balance = self.state.ledger.available(asset);
        CheckpointValidator::new(&self.config).validate_and_record(
            &mut self.state.checkpoints,
            &mut self.state.last_guarded,
            ctx,
            current_balance,
        )
    }

    fn record<E>(&mut self, event: E)
    where
        E: Event + Into<FlashGuardEvent>,
    {
        event.emit();
        self.events.push(event.into());
    }

    fn atomically<T, F>(&mut self, body: F) -> FlashGuardResult<T>
    where
        F: FnOnce(&mut Self) -> FlashGuardResult<T>,
    {
        let snapshot = self.state.clone();
        let events_before = self.events.len();

        let result = body(self);
        if let Err(err) = &result {
            msg!("Call failed, discarding its effects: {}", err);
            self.state = snapshot;
            self.events.truncate(events_before);
        }
        result
    }
}
