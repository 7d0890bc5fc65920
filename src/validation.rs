use solana_program::{
    account_info::AccountInfo,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use crate::error::NameAuctionError;

pub const MAX_NAME_LENGTH: usize = 64;

pub fn validate_name(name: &str) -> Result<(), ProgramError> {
    if name.is_empty() {
        return Err(NameAuctionError::InvalidNameFormat.into());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(NameAuctionError::InvalidNameFormat.into());
    }
    Ok(())
}

pub fn validate_amount(amount: u64) -> Result<(), ProgramError> {
    if amount == 0 {
        return Err(NameAuctionError::InvalidAmount.into());
    }
    Ok(())
}

pub fn check_signer(account: &AccountInfo) -> Result<(), ProgramError> {
    if !account.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

pub fn check_system_program(account: &AccountInfo) -> Result<(), ProgramError> {
    if account.key != &system_program::id() {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// The supplied account must sit at the address we derived for it.
pub fn check_account_key(account: &AccountInfo, expected: &Pubkey) -> Result<(), ProgramError> {
    if account.key != expected {
        return Err(NameAuctionError::InvalidAccountAddress.into());
    }
    Ok(())
}

/// A derived account that is about to be created must not hold data or
/// belong to anyone but the system program yet.
pub fn check_unclaimed(account: &AccountInfo) -> Result<(), ProgramError> {
    if !account.data_is_empty() || account.owner != &system_program::id() {
        return Err(NameAuctionError::AlreadyExists.into());
    }
    Ok(())
}

/// Existing records must be owned by this program.
pub fn check_program_owned(account: &AccountInfo, program_id: &Pubkey) -> Result<(), ProgramError> {
    if account.owner != program_id || account.data_is_empty() {
        return Err(NameAuctionError::NotFound.into());
    }
    Ok(())
}
