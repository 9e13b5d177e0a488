//! Untrusted code the engine hands control to
//!
//! Both callbacks get an `EngineHandle` back. It reaches the public entry
//! points and read-only views only, so a callee can never touch the lock
//! store or swap the pool state out from under the call in progress.

use solana_program::pubkey::Pubkey;

use crate::{
    config::GuardConfig,
    context::CallContext,
    engine::{FlashLoanEngine, LoanReceipt},
    error::FlashGuardResult,
    events::FlashGuardEvent,
    state::{LoanCheckpoint, PoolStats},
};

/// The engine as seen from inside a callback
pub struct EngineHandle<'a> {
    engine: &'a mut FlashLoanEngine,
}

impl<'a> EngineHandle<'a> {
    pub(crate) fn new(engine: &'a mut FlashLoanEngine) -> Self {
        Self { engine }
    }

    pub fn deposit(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.engine.deposit(ctx, asset, amount)
    }

    pub fn withdraw(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.engine.withdraw(ctx, asset, amount)
    }

    pub fn execute_flash_loan(
        &mut self,
        ctx: &CallContext,
        borrower: &mut dyn FlashBorrower,
        asset: &Pubkey,
        amount: u64,
        data: &[u8],
    ) -> FlashGuardResult<LoanReceipt> {
        self.engine.execute_flash_loan(ctx, borrower, asset, amount, data)
    }

    pub fn repay(&mut self, ctx: &CallContext, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        self.engine.repay(ctx, asset, amount)
    }

    pub fn fund_native(&mut self, ctx: &CallContext, amount: u64) -> FlashGuardResult<u64> {
        self.engine.fund_native(ctx, amount)
    }

    pub fn transfer_native(
        &mut self,
        ctx: &CallContext,
        recipient: &mut dyn NativeRecipient,
        amount: u64,
    ) -> FlashGuardResult<()> {
        self.engine.transfer_native(ctx, recipient, amount)
    }

    pub fn config(&self) -> &GuardConfig {
        self.engine.config()
    }

    pub fn available(&self, asset: &Pubkey) -> u64 {
        self.engine.available(asset)
    }

    pub fn native_balance(&self) -> u64 {
        self.engine.native_balance()
    }

    pub fn checkpoint(&self, account: &Pubkey) -> LoanCheckpoint {
        self.engine.checkpoint(account)
    }

    pub fn last_guarded_slot(&self, account: &Pubkey) -> u64 {
        self.engine.last_guarded_slot(account)
    }

    pub fn is_locked(&self, account: &Pubkey) -> bool {
        self.engine.is_locked(account)
    }

    pub fn stats(&self) -> &PoolStats {
        self.engine.stats()
    }

    pub fn events(&self) -> &[FlashGuardEvent] {
        self.engine.events()
    }
}

/// What the borrower is told while it holds the funds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashLoanTerms {
    pub borrower: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub fee: u64,
    /// Whole pool balance of the asset handed out for the duration of the call
    pub disbursed: u64,
    /// Pool balance required when the callback returns
    pub repayment_due: u64,
}

pub trait FlashBorrower {
    /// Called with the asset balance handed out. Repay by calling
    /// `engine.repay` before returning.
    fn on_flash_loan(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        terms: &FlashLoanTerms,
        data: &[u8],
    ) -> FlashGuardResult<()>;
}

impl<F> FlashBorrower for F
where
    F: FnMut(&mut EngineHandle<'_>, &CallContext, &FlashLoanTerms, &[u8]) -> FlashGuardResult<()>,
{
    fn on_flash_loan(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        terms: &FlashLoanTerms,
        data: &[u8],
    ) -> FlashGuardResult<()> {
        self(engine, ctx, terms, data)
    }
}

/// Receiver of a native-currency transfer. Returning an error rejects it.
pub trait NativeRecipient {
    fn key(&self) -> Pubkey;

    fn on_receive(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        amount: u64,
    ) -> FlashGuardResult<()>;
}
