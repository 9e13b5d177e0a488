#![allow(dead_code)]

use flash_loan_guard::{
    constants::{MIN_CHECKPOINT_INTERVAL_SECS, MIN_SLOT_DELTA},
    CallContext, EngineHandle, FlashBorrower, FlashGuardError, FlashGuardResult, FlashLoanEngine,
    FlashLoanTerms, NativeRecipient,
};
use solana_program::pubkey::Pubkey;

pub const T0: i64 = 1_700_000_000;
pub const START_SLOT: u64 = 1_000;

pub fn ctx(caller: Pubkey) -> CallContext {
    CallContext::new(caller, START_SLOT, T0)
}

/// Moves the clock far enough that every checkpoint timing check passes again
pub fn next_window(ctx: &CallContext) -> CallContext {
    CallContext::new(
        ctx.caller,
        ctx.slot + MIN_SLOT_DELTA,
        ctx.unix_timestamp + MIN_CHECKPOINT_INTERVAL_SECS,
    )
}

/// Engine whose pool holds `amount` of a fresh asset, deposited by a fresh
/// liquidity provider at the start slot
pub fn seeded_engine(amount: u64) -> (FlashLoanEngine, Pubkey) {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    engine
        .deposit(&ctx(Pubkey::new_unique()), &asset, amount)
        .unwrap();
    engine.drain_events();
    (engine, asset)
}

/// Pays back `repayment_due - shortfall`
pub struct Repayer {
    pub shortfall: u64,
    pub seen_terms: Option<FlashLoanTerms>,
    pub balance_during_call: Option<u64>,
}

impl Repayer {
    pub fn exact() -> Self {
        Self::short_by(0)
    }

    pub fn short_by(shortfall: u64) -> Self {
        Self {
            shortfall,
            seen_terms: None,
            balance_during_call: None,
        }
    }
}

impl FlashBorrower for Repayer {
    fn on_flash_loan(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        terms: &FlashLoanTerms,
        _data: &[u8],
    ) -> FlashGuardResult<()> {
        self.seen_terms = Some(*terms);
        self.balance_during_call = Some(engine.available(&terms.asset));

        let amount = terms.repayment_due.saturating_sub(self.shortfall);
        if amount > 0 {
            engine.repay(ctx, &terms.asset, amount)?;
        }
        Ok(())
    }
}

pub struct FailingBorrower;

impl FlashBorrower for FailingBorrower {
    fn on_flash_loan(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        terms: &FlashLoanTerms,
        _data: &[u8],
    ) -> FlashGuardResult<()> {
        // Repays in full, then fails anyway
        engine.repay(ctx, &terms.asset, terms.repayment_due)?;
        Err(FlashGuardError::InvalidAmount)
    }
}

/// Which entry point a reentrant borrower tries to call back into
#[derive(Clone, Copy, Debug)]
pub enum Reentry {
    FlashLoan,
    Deposit,
    Withdraw,
    TransferNative,
}

/// Tries one reentrant call, remembers its outcome, then repays in full
pub struct ReentrantBorrower {
    pub reentry: Reentry,
    pub as_caller: Option<Pubkey>,
    pub observed: Option<FlashGuardResult<()>>,
}

impl ReentrantBorrower {
    pub fn new(reentry: Reentry) -> Self {
        Self {
            reentry,
            as_caller: None,
            observed: None,
        }
    }

    pub fn as_other_caller(reentry: Reentry, caller: Pubkey) -> Self {
        Self {
            reentry,
            as_caller: Some(caller),
            observed: None,
        }
    }
}

impl FlashBorrower for ReentrantBorrower {
    fn on_flash_loan(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        terms: &FlashLoanTerms,
        data: &[u8],
    ) -> FlashGuardResult<()> {
        let inner_ctx = match self.as_caller {
            Some(caller) => ctx.with_caller(caller),
            None => *ctx,
        };

        let outcome = match self.reentry {
            Reentry::FlashLoan => engine
                .execute_flash_loan(&inner_ctx, &mut Repayer::exact(), &terms.asset, 1, data)
                .map(|_| ()),
            Reentry::Deposit => engine.deposit(&inner_ctx, &terms.asset, 1).map(|_| ()),
            Reentry::Withdraw => engine.withdraw(&inner_ctx, &terms.asset, 1).map(|_| ()),
            Reentry::TransferNative => {
                engine.transfer_native(&inner_ctx, &mut AcceptingRecipient::new(), 1)
            }
        };
        self.observed = Some(outcome);

        let owed = terms
            .repayment_due
            .saturating_sub(engine.available(&terms.asset));
        if owed > 0 {
            engine.repay(ctx, &terms.asset, owed)?;
        }
        Ok(())
    }
}

pub struct AcceptingRecipient {
    pub key: Pubkey,
    pub received: u64,
}

impl AcceptingRecipient {
    pub fn new() -> Self {
        Self {
            key: Pubkey::new_unique(),
            received: 0,
        }
    }
}

impl NativeRecipient for AcceptingRecipient {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn on_receive(
        &mut self,
        _engine: &mut EngineHandle<'_>,
        _ctx: &CallContext,
        amount: u64,
    ) -> FlashGuardResult<()> {
        self.received += amount;
        Ok(())
    }
}

pub struct RejectingRecipient {
    pub key: Pubkey,
}

impl NativeRecipient for RejectingRecipient {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn on_receive(
        &mut self,
        _engine: &mut EngineHandle<'_>,
        _ctx: &CallContext,
        _amount: u64,
    ) -> FlashGuardResult<()> {
        Err(FlashGuardError::InvalidInstruction)
    }
}

/// Tries to pull a second transfer out of the pool from inside `on_receive`
pub struct ReentrantRecipient {
    pub key: Pubkey,
    pub as_caller: Option<Pubkey>,
    pub observed: Option<FlashGuardResult<()>>,
}

impl NativeRecipient for ReentrantRecipient {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn on_receive(
        &mut self,
        engine: &mut EngineHandle<'_>,
        ctx: &CallContext,
        amount: u64,
    ) -> FlashGuardResult<()> {
        let inner_ctx = match self.as_caller {
            Some(caller) => ctx.with_caller(caller),
            None => *ctx,
        };
        let mut sink = AcceptingRecipient::new();
        self.observed = Some(engine.transfer_native(&inner_ctx, &mut sink, amount));
        Ok(())
    }
}
