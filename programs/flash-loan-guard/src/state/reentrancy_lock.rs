use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Accounts that currently have a guarded call on the stack
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReentrancyLocks {
    entered: BTreeSet<Pubkey>,
}

impl ReentrancyLocks {
    pub fn is_entered(&self, account: &Pubkey) -> bool {
        self.entered.contains(account)
    }

    /// Returns false if the lock was already held
    pub fn try_set(&mut self, account: &Pubkey) -> bool {
        self.entered.insert(*account)
    }

    pub fn clear(&mut self, account: &Pubkey) {
        self.entered.remove(account);
    }

    pub fn held_count(&self) -> usize {
        self.entered.len()
    }
}
