use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

use crate::{
    error::{FlashGuardError, FlashGuardResult},
    state::{AssetLedger, CheckpointStore, LastGuardedSlots, ReentrancyLocks},
};

/// Running totals, only advanced by successful calls
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub loans_executed: u64,
    pub fees_collected: u64,
    pub deposits: u64,
    pub withdrawals: u64,
    pub native_transfers: u64,
}

/// Everything the engine owns. Snapshotted on entry to each call and
/// restored if the call fails.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolState {
    pub discriminator: [u8; 8],
    pub ledger: AssetLedger,
    pub checkpoints: CheckpointStore,
    pub last_guarded: LastGuardedSlots,
    pub locks: ReentrancyLocks,
    /// Native balance held by the pool itself
    pub native_lamports: u64,
    pub stats: PoolStats,
}

impl PoolState {
    pub const DISCRIMINATOR: [u8; 8] = *b"FLGUARD0";

    pub fn new() -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            ..Self::default()
        }
    }

    pub fn pack(&self) -> FlashGuardResult<Vec<u8>> {
        self.try_to_vec()
            .map_err(|_| FlashGuardError::InvalidPoolState)
    }

    pub fn unpack(data: &[u8]) -> FlashGuardResult<Self> {
        let state = Self::try_from_slice(data).map_err(|e| {
            msg!("Failed to decode pool state: {}", e);
            FlashGuardError::InvalidPoolState
        })?;

        if state.discriminator != Self::DISCRIMINATOR {
            msg!("Pool state discriminator mismatch");
            return Err(FlashGuardError::InvalidPoolState);
        }

        Ok(state)
    }
}
