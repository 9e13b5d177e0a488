use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

/// Snapshot taken the last time an account passed the checkpoint validator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanCheckpoint {
    pub balance: u64,
    pub timestamp: UnixTimestamp,
    pub slot: u64,
}

/// Checkpoints keyed by account. Missing entries read as the zero checkpoint.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointStore {
    checkpoints: BTreeMap<Pubkey, LoanCheckpoint>,
}

impl CheckpointStore {
    pub fn get(&self, account: &Pubkey) -> LoanCheckpoint {
        self.checkpoints.get(account).copied().unwrap_or_default()
    }

    pub fn record(&mut self, account: &Pubkey, checkpoint: LoanCheckpoint) {
        self.checkpoints.insert(*account, checkpoint);
    }
}

/// Slot at which each account last passed the validator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LastGuardedSlots {
    slots: BTreeMap<Pubkey, u64>,
}

impl LastGuardedSlots {
    pub fn get(&self, account: &Pubkey) -> u64 {
        self.slots.get(account).copied().unwrap_or(0)
    }

    pub fn record(&mut self, account: &Pubkey, slot: u64) {
        self.slots.insert(*account, slot);
    }
}
