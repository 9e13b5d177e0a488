use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::error::{FlashGuardError, FlashGuardResult};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum FlashGuardInstruction {
    /// Credit the pool. Runs the checkpoint validator for the caller.
    Deposit { asset: Pubkey, amount: u64 },

    /// Debit the pool. Runs the checkpoint validator for the caller.
    Withdraw { asset: Pubkey, amount: u64 },

    /// Lend to the borrower program registered under `receiver`, passing it
    /// `data` untouched
    FlashLoan {
        receiver: Pubkey,
        asset: Pubkey,
        amount: u64,
        data: Vec<u8>,
    },

    /// Pay an asset back into the pool
    Repay { asset: Pubkey, amount: u64 },

    /// Send native currency to the recipient program registered under `recipient`
    TransferNative { recipient: Pubkey, amount: u64 },

    /// Add to the pool's native balance
    FundNative { amount: u64 },
}

impl FlashGuardInstruction {
    pub fn unpack(input: &[u8]) -> FlashGuardResult<Self> {
        Self::try_from_slice(input).map_err(|e| {
            msg!("Failed to decode instruction: {}", e);
            FlashGuardError::InvalidInstruction
        })
    }

    pub fn pack(&self) -> FlashGuardResult<Vec<u8>> {
        self.try_to_vec().map_err(|e| {
            msg!("Failed to encode instruction: {}", e);
            FlashGuardError::InvalidInstruction
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Withdraw { .. } => "Withdraw",
            Self::FlashLoan { .. } => "FlashLoan",
            Self::Repay { .. } => "Repay",
            Self::TransferNative { .. } => "TransferNative",
            Self::FundNative { .. } => "FundNative",
        }
    }
}

pub fn deposit(asset: Pubkey, amount: u64) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::Deposit { asset, amount }.pack()
}

pub fn withdraw(asset: Pubkey, amount: u64) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::Withdraw { asset, amount }.pack()
}

pub fn flash_loan(
    receiver: Pubkey,
    asset: Pubkey,
    amount: u64,
    data: Vec<u8>,
) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::FlashLoan {
        receiver,
        asset,
        amount,
        data,
    }
    .pack()
}

pub fn repay(asset: Pubkey, amount: u64) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::Repay { asset, amount }.pack()
}

pub fn transfer_native(recipient: Pubkey, amount: u64) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::TransferNative { recipient, amount }.pack()
}

pub fn fund_native(amount: u64) -> FlashGuardResult<Vec<u8>> {
    FlashGuardInstruction::FundNative { amount }.pack()
}
