use solana_program::{
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::{Pubkey, PUBKEY_BYTES},
};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::NameAuctionError;

/// Marks a name as entered. Lives at the name's derived address.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub digest: [u8; 32],
    pub root: Pubkey,
    pub bump: u8,
}

/// Cumulative contributions toward a root name. The lamports themselves sit in
/// the program vault.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FundingState {
    pub root: Pubkey,
    pub total: u64,
}

impl Sealed for NameRecord {}
impl Sealed for FundingState {}

impl IsInitialized for NameRecord {
    fn is_initialized(&self) -> bool {
        self.digest != [0u8; 32]
    }
}

impl IsInitialized for FundingState {
    fn is_initialized(&self) -> bool {
        self.root != Pubkey::default()
    }
}

impl Pack for NameRecord {
    const LEN: usize = 32 + 32 + 1; // digest + root + bump

    fn pack_into_slice(&self, mut dst: &mut [u8]) {
        // `Pack::pack` has already checked that dst is exactly LEN bytes
        let _ = self.serialize(&mut dst);
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(src).map_err(|_| ProgramError::InvalidAccountData)
    }
}

impl Pack for FundingState {
    const LEN: usize = 32 + 8; // root + total

    fn pack_into_slice(&self, mut dst: &mut [u8]) {
        let _ = self.serialize(&mut dst);
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(src).map_err(|_| ProgramError::InvalidAccountData)
    }
}

/// Append-only list of every entered name address.
///
/// Layout: a little-endian `u32` count, then fixed 32-byte slots. The number of
/// slots is whatever the account was sized for; appending past it fails.
pub struct EntryList;

impl EntryList {
    pub const HEADER_LEN: usize = 4;

    pub fn space(capacity: u32) -> usize {
        Self::HEADER_LEN + capacity as usize * PUBKEY_BYTES
    }

    pub fn capacity(data: &[u8]) -> usize {
        data.len().saturating_sub(Self::HEADER_LEN) / PUBKEY_BYTES
    }

    pub fn count(data: &[u8]) -> Result<u32, ProgramError> {
        let header: [u8; 4] = data
            .get(..Self::HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or(NameAuctionError::NotInitialized)?;
        let count = u32::from_le_bytes(header);
        if count as usize > Self::capacity(data) {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(count)
    }

    pub fn entries(data: &[u8]) -> Result<Vec<Pubkey>, ProgramError> {
        let count = Self::count(data)? as usize;
        let slots = &data[Self::HEADER_LEN..Self::HEADER_LEN + count * PUBKEY_BYTES];
        slots
            .chunks_exact(PUBKEY_BYTES)
            .map(|slot| Pubkey::try_from(slot).map_err(|_| ProgramError::InvalidAccountData))
            .collect()
    }

    /// Writes `key` into the next free slot and returns the new count.
    pub fn append(data: &mut [u8], key: &Pubkey) -> Result<u32, ProgramError> {
        let count = Self::count(data)?;
        if count as usize >= Self::capacity(data) {
            return Err(NameAuctionError::EntryListFull.into());
        }
        let start = Self::HEADER_LEN + count as usize * PUBKEY_BYTES;
        data[start..start + PUBKEY_BYTES].copy_from_slice(key.as_ref());

        let new_count = count + 1;
        data[..Self::HEADER_LEN].copy_from_slice(&new_count.to_le_bytes());
        Ok(new_count)
    }
}
