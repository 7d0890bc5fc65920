use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameAuctionError {
    #[error("Account already exists")]
    AlreadyExists,

    #[error("Account not found")]
    NotFound,

    #[error("Funding amount must be positive")]
    InvalidAmount,

    #[error("Funding total overflow")]
    Overflow,

    #[error("No valid bump for derived address")]
    DerivationExhausted,

    #[error("Invalid name format")]
    InvalidNameFormat,

    #[error("Supplied account does not match derived address")]
    InvalidAccountAddress,

    #[error("Entry list is full")]
    EntryListFull,

    #[error("Invalid entry list capacity")]
    InvalidCapacity,

    #[error("Account not initialized")]
    NotInitialized,
}

impl From<NameAuctionError> for ProgramError {
    fn from(e: NameAuctionError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
