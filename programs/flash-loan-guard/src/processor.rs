use std::collections::BTreeMap;

use solana_program::{
    entrypoint::ProgramResult,
    msg,
    program_error::{PrintProgramError, ProgramError},
    pubkey::Pubkey,
};

use crate::{
    callback::{FlashBorrower, NativeRecipient},
    context::CallContext,
    engine::FlashLoanEngine,
    error::{FlashGuardError, FlashGuardResult},
    instruction::FlashGuardInstruction,
};

/// Programs the host can hand control to, keyed by program id
#[derive(Default)]
pub struct ProgramRegistry {
    borrowers: BTreeMap<Pubkey, Box<dyn FlashBorrower>>,
    recipients: BTreeMap<Pubkey, Box<dyn NativeRecipient>>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_borrower(&mut self, program_id: Pubkey, borrower: Box<dyn FlashBorrower>) {
        self.borrowers.insert(program_id, borrower);
    }

    pub fn register_recipient(&mut self, recipient: Box<dyn NativeRecipient>) {
        self.recipients.insert(recipient.key(), recipient);
    }

    pub fn is_registered(&self, program_id: &Pubkey) -> bool {
        self.borrowers.contains_key(program_id) || self.recipients.contains_key(program_id)
    }
}

pub struct Processor;

impl Processor {
    pub fn process(
        engine: &mut FlashLoanEngine,
        registry: &mut ProgramRegistry,
        ctx: &CallContext,
        instruction_data: &[u8],
    ) -> ProgramResult {
        Self::dispatch(engine, registry, ctx, instruction_data).map_err(|err| {
            err.print::<FlashGuardError>();
            ProgramError::from(err)
        })
    }

    fn dispatch(
        engine: &mut FlashLoanEngine,
        registry: &mut ProgramRegistry,
        ctx: &CallContext,
        instruction_data: &[u8],
    ) -> FlashGuardResult<()> {
        let instruction = FlashGuardInstruction::unpack(instruction_data)?;
        msg!("Instruction: {}", instruction.name());

        match instruction {
            FlashGuardInstruction::Deposit { asset, amount } => {
                engine.deposit(ctx, &asset, amount)?;
            }

            FlashGuardInstruction::Withdraw { asset, amount } => {
                engine.withdraw(ctx, &asset, amount)?;
            }

            FlashGuardInstruction::FlashLoan {
                receiver,
                asset,
                amount,
                data,
            } => {
                Self::process_flash_loan(engine, registry, ctx, receiver, asset, amount, &data)?;
            }

            FlashGuardInstruction::Repay { asset, amount } => {
                engine.repay(ctx, &asset, amount)?;
            }

            FlashGuardInstruction::TransferNative { recipient, amount } => {
                Self::process_transfer_native(engine, registry, ctx, recipient, amount)?;
            }

            FlashGuardInstruction::FundNative { amount } => {
                engine.fund_native(ctx, amount)?;
            }
        }

        Ok(())
    }

    fn process_flash_loan(
        engine: &mut FlashLoanEngine,
        registry: &mut ProgramRegistry,
        ctx: &CallContext,
        receiver: Pubkey,
        asset: Pubkey,
        amount: u64,
        data: &[u8],
    ) -> FlashGuardResult<()> {
        let mut borrower = registry.borrowers.remove(&receiver).ok_or_else(|| {
            msg!("No borrower program registered at {}", receiver);
            FlashGuardError::UnknownProgram
        })?;

        let result = engine.execute_flash_loan(ctx, borrower.as_mut(), &asset, amount, data);
        registry.borrowers.insert(receiver, borrower);

        let receipt = result?;
        msg!(
            "Flash loan repaid: fee {}, balance {} -> {}",
            receipt.fee,
            receipt.initial_balance,
            receipt.final_balance
        );
        Ok(())
    }

    fn process_transfer_native(
        engine: &mut FlashLoanEngine,
        registry: &mut ProgramRegistry,
        ctx: &CallContext,
        recipient: Pubkey,
        amount: u64,
    ) -> FlashGuardResult<()> {
        let mut target = registry.recipients.remove(&recipient).ok_or_else(|| {
            msg!("No recipient program registered at {}", recipient);
            FlashGuardError::UnknownProgram
        })?;

        let result = engine.transfer_native(ctx, target.as_mut(), amount);
        registry.recipients.insert(recipient, target);
        result
    }
}
