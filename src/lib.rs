use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

pub mod derivation;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod validation;

use instruction::NameAuctionInstruction;
use processor::Processor;

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = NameAuctionInstruction::unpack(instruction_data)?;
    Processor::process(program_id, accounts, instruction)
}
