//! Event logging
//!
//! Events are written to the program log as a marker line, the event type and
//! the bs58-encoded borsh payload. The engine also keeps them in memory so a
//! host can read them back after the call commits.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

pub const EVENT_MARKER: &str = "FLASH_LOAN_GUARD_EVENT";

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    // Loan events
    LoanExecuted = 1,

    // Ledger events
    Deposited = 10,
    Withdrawn = 11,
    Repaid = 12,

    // Native currency events
    NativeFunded = 20,
    NativeTransferred = 21,
}

pub trait Event: BorshSerialize {
    fn event_type() -> EventType;

    fn emit(&self) {
        msg!(EVENT_MARKER);
        msg!("TYPE:{:?}", Self::event_type());

        if let Ok(data) = self.try_to_vec() {
            msg!("DATA:{}", bs58::encode(&data).into_string());
        }
    }
}

macro_rules! define_event {
    ($name:ident { $($field:ident: $type:ty),* $(,)? }) => {
        #[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: $type,)*
        }

        impl Event for $name {
            fn event_type() -> EventType {
                EventType::$name
            }
        }

        impl From<$name> for FlashGuardEvent {
            fn from(event: $name) -> Self {
                FlashGuardEvent::$name(event)
            }
        }
    };
}

define_event!(LoanExecuted {
    borrower: Pubkey,
    asset: Pubkey,
    amount: u64,
    fee: u64,
});

define_event!(Deposited {
    account: Pubkey,
    asset: Pubkey,
    amount: u64,
    new_balance: u64,
});

define_event!(Withdrawn {
    account: Pubkey,
    asset: Pubkey,
    amount: u64,
    new_balance: u64,
});

define_event!(Repaid {
    payer: Pubkey,
    asset: Pubkey,
    amount: u64,
    new_balance: u64,
});

define_event!(NativeFunded {
    funder: Pubkey,
    amount: u64,
    new_balance: u64,
});

define_event!(NativeTransferred {
    sender: Pubkey,
    recipient: Pubkey,
    amount: u64,
});

/// Every event the engine records, in emission order
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum FlashGuardEvent {
    LoanExecuted(LoanExecuted),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Repaid(Repaid),
    NativeFunded(NativeFunded),
    NativeTransferred(NativeTransferred),
}

/// Parse the `TYPE:` and `DATA:` lines that follow an event marker
pub fn parse_event(type_line: &str, data_line: &str) -> Option<(String, Vec<u8>)> {
    let event_type = type_line.strip_prefix("TYPE:")?;
    let data = data_line.strip_prefix("DATA:")?;
    let bytes = bs58::decode(data).into_vec().ok()?;
    Some((event_type.to_string(), bytes))
}
