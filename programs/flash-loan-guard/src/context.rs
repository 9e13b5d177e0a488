use solana_program::{
    clock::{Clock, Slot, UnixTimestamp},
    pubkey::Pubkey,
};

/// What the host tells the engine about the call in progress: who is calling
/// and where the sequence clock stands. The engine reads it, never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Pubkey,
    pub slot: Slot,
    pub unix_timestamp: UnixTimestamp,
}

impl CallContext {
    pub fn new(caller: Pubkey, slot: Slot, unix_timestamp: UnixTimestamp) -> Self {
        Self {
            caller,
            slot,
            unix_timestamp,
        }
    }

    pub fn from_clock(caller: Pubkey, clock: &Clock) -> Self {
        Self::new(caller, clock.slot, clock.unix_timestamp)
    }

    /// Same clock, different caller
    pub fn with_caller(&self, caller: Pubkey) -> Self {
        Self { caller, ..*self }
    }
}
