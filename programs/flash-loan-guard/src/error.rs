//! Error types for the flash loan guard
//!
//! Every variant aborts the call that produced it. Codes are stable so they
//! survive the round trip through `ProgramError::Custom`.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

pub type FlashGuardResult<T> = Result<T, FlashGuardError>;

#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum FlashGuardError {
    // Guard errors (6000-6009)
    #[error("Reentrant call detected")]
    ReentrancyError = 6000,

    // Checkpoint validation errors (6010-6019)
    #[error("Cooldown active: account already passed validation at this slot")]
    CooldownActive = 6010,

    #[error("Checkpoint interval too short")]
    IntervalTooShort = 6011,

    #[error("Checkpoint slot delta too short")]
    HeightTooShort = 6012,

    #[error("Balance changed too much since last checkpoint")]
    ExcessiveBalanceChange = 6013,

    // Loan and ledger errors (6020-6029)
    #[error("Invalid amount")]
    InvalidAmount = 6020,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity = 6021,

    #[error("Borrower callback failed")]
    CallbackExecutionFailed = 6022,

    #[error("Flash loan repayment insufficient")]
    RepaymentInsufficient = 6023,

    #[error("Native transfer rejected by recipient")]
    TransferFailed = 6024,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 6025,

    // Host and decoding errors (6030-6039)
    #[error("Invalid instruction")]
    InvalidInstruction = 6030,

    #[error("No program registered for key")]
    UnknownProgram = 6031,

    #[error("Invalid guard configuration")]
    InvalidConfig = 6032,

    #[error("Invalid pool state data")]
    InvalidPoolState = 6033,
}

/// The four ways the checkpoint validator can refuse a call
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationFailure {
    CooldownActive,
    IntervalTooShort,
    HeightTooShort,
    ExcessiveBalanceChange,
}

impl From<ValidationFailure> for FlashGuardError {
    fn from(reason: ValidationFailure) -> Self {
        match reason {
            ValidationFailure::CooldownActive => FlashGuardError::CooldownActive,
            ValidationFailure::IntervalTooShort => FlashGuardError::IntervalTooShort,
            ValidationFailure::HeightTooShort => FlashGuardError::HeightTooShort,
            ValidationFailure::ExcessiveBalanceChange => FlashGuardError::ExcessiveBalanceChange,
        }
    }
}

impl FlashGuardError {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Returns the validator reason when this error came from the checkpoint validator
    pub fn validation_reason(&self) -> Option<ValidationFailure> {
        match self {
            Self::CooldownActive => Some(ValidationFailure::CooldownActive),
            Self::IntervalTooShort => Some(ValidationFailure::IntervalTooShort),
            Self::HeightTooShort => Some(ValidationFailure::HeightTooShort),
            Self::ExcessiveBalanceChange => Some(ValidationFailure::ExcessiveBalanceChange),
            _ => None,
        }
    }
}

impl PrintProgramError for FlashGuardError {
    fn print<E>(&self) {
        msg!("Flash Loan Guard Error: {}", self);
    }
}

impl From<FlashGuardError> for ProgramError {
    fn from(e: FlashGuardError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for FlashGuardError {
    fn type_of() -> &'static str {
        "FlashGuardError"
    }
}

impl TryFrom<ProgramError> for FlashGuardError {
    type Error = ProgramError;

    fn try_from(error: ProgramError) -> Result<Self, Self::Error> {
        match error {
            ProgramError::Custom(code) => FlashGuardError::from_u32(code).ok_or(error),
            _ => Err(error),
        }
    }
}
