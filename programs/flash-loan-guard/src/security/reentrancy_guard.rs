//! Reentrancy Guard
//!
//! Per-account lock that keeps a second guarded call for the same account off
//! the stack while the first one is still running. Accounts never contend
//! with each other.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::{FlashGuardError, FlashGuardResult},
    state::ReentrancyLocks,
};

/// Anything that owns a lock store can run guarded sections
pub(crate) trait HasReentrancyLocks {
    fn reentrancy_locks(&mut self) -> &mut ReentrancyLocks;
}

pub struct ReentrancyGuard;

impl ReentrancyGuard {
    /// Enter guarded section
    pub fn enter(locks: &mut ReentrancyLocks, account: &Pubkey) -> FlashGuardResult<()> {
        if !locks.try_set(account) {
            msg!("Reentrancy detected for {}", account);
            return Err(FlashGuardError::ReentrancyError);
        }
        Ok(())
    }

    /// Exit guarded section. Clears the lock whatever its state.
    pub fn exit(locks: &mut ReentrancyLocks, account: &Pubkey) {
        locks.clear(account);
    }

    /// Fails if a guarded call for the account is already on the stack,
    /// without taking the lock
    pub fn ensure_not_entered(locks: &ReentrancyLocks, account: &Pubkey) -> FlashGuardResult<()> {
        if locks.is_entered(account) {
            msg!("Reentrant call for {} while guard is held", account);
            return Err(FlashGuardError::ReentrancyError);
        }
        Ok(())
    }
}

/// Runs `body` with the account's lock held. The lock is released on every
/// return path of `body`, `Ok` or `Err`.
pub(crate) fn with_reentrancy_guard<S, T, F>(
    state: &mut S,
    account: &Pubkey,
    body: F,
) -> FlashGuardResult<T>
where
    S: HasReentrancyLocks,
    F: FnOnce(&mut S) -> FlashGuardResult<T>,
{
    ReentrancyGuard::enter(state.reentrancy_locks(), account)?;
    let result = body(state);
    ReentrancyGuard::exit(state.reentrancy_locks(), account);
    result
}
