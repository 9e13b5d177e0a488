use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::error::{FlashGuardError, FlashGuardResult};

/// Per-asset balances held by the pool
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetLedger {
    balances: BTreeMap<Pubkey, u64>,
}

impl AssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self, asset: &Pubkey) -> u64 {
        self.balances.get(asset).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        let balance = self
            .available(asset)
            .checked_add(amount)
            .ok_or(FlashGuardError::ArithmeticOverflow)?;
        self.balances.insert(*asset, balance);
        Ok(balance)
    }

    pub fn debit(&mut self, asset: &Pubkey, amount: u64) -> FlashGuardResult<u64> {
        let available = self.available(asset);
        if amount > available {
            msg!(
                "Insufficient liquidity for {}: requested {}, available {}",
                asset,
                amount,
                available
            );
            return Err(FlashGuardError::InsufficientLiquidity);
        }

        let balance = available - amount;
        self.balances.insert(*asset, balance);
        Ok(balance)
    }

    /// Hands the whole balance out; returns what was there
    pub fn zero(&mut self, asset: &Pubkey) -> u64 {
        self.balances.insert(*asset, 0).unwrap_or(0)
    }
}
