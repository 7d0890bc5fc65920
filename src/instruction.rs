use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::derivation::{
    derive_name_address, find_entry_list_address, find_funding_state_address,
    find_program_record_address, find_vault_address, get_hashed_name,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum NameAuctionInstruction {
    /// Create the global entry list with room for `capacity` names
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer
    /// 1. `[writable]` The entry list account
    /// 2. `[]` The system program
    InitializeEntryList {
        capacity: u32,
    },

    /// Grow the global entry list to `capacity` names
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer
    /// 1. `[writable]` The entry list account
    /// 2. `[]` The system program
    ResizeEntryList {
        capacity: u32,
    },

    /// Create the vault that holds every contributed lamport
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer
    /// 1. `[writable]` The vault account
    /// 2. `[]` The system program
    InitializeVault,

    /// Enter a root name into the auction and open its funding state
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer
    /// 1. `[writable]` The root name account
    /// 2. `[writable]` The funding state account
    /// 3. `[writable]` The entry list account
    /// 4. `[]` The system program
    CreateFunding {
        name: String,
    },

    /// Contribute `amount` lamports toward a root name
    /// Accounts expected:
    /// 0. `[signer, writable]` The contributor
    /// 1. `[]` The program record of the root name
    /// 2. `[writable]` The funding state account
    /// 3. `[writable]` The vault account
    /// 4. `[]` The system program
    AddFunding {
        amount: u64,
        name: String,
    },

    /// Enter a name scoped under an already entered parent
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer
    /// 1. `[writable]` The name account
    /// 2. `[writable]` The entry list account
    /// 3. `[]` The parent name account
    /// 4. `[]` The system program
    CreateName {
        name: String,
        parent: Pubkey,
    },

    /// Return the funding total as little-endian `u64` return data
    /// Accounts expected:
    /// 0. `[]` The funding state account
    GetFundingState,

    /// Return the number of entered names as little-endian `u32` return data
    /// Accounts expected:
    /// 0. `[]` The entry list account
    GetEntryCount,
}

impl NameAuctionInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec().map_err(|_| ProgramError::InvalidInstructionData)
    }

    fn into_instruction(
        self,
        program_id: &Pubkey,
        accounts: Vec<AccountMeta>,
    ) -> Result<Instruction, ProgramError> {
        Ok(Instruction {
            program_id: *program_id,
            accounts,
            data: self.pack()?,
        })
    }
}

pub fn initialize_entry_list(
    program_id: &Pubkey,
    payer: &Pubkey,
    capacity: u32,
) -> Result<Instruction, ProgramError> {
    let (entry_list, _) = find_entry_list_address(program_id)?;
    NameAuctionInstruction::InitializeEntryList { capacity }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(entry_list, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn resize_entry_list(
    program_id: &Pubkey,
    payer: &Pubkey,
    capacity: u32,
) -> Result<Instruction, ProgramError> {
    let (entry_list, _) = find_entry_list_address(program_id)?;
    NameAuctionInstruction::ResizeEntryList { capacity }.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(entry_list, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn initialize_vault(program_id: &Pubkey, payer: &Pubkey) -> Result<Instruction, ProgramError> {
    let (vault, _) = find_vault_address(program_id)?;
    NameAuctionInstruction::InitializeVault.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn create_funding(
    program_id: &Pubkey,
    payer: &Pubkey,
    name: &str,
) -> Result<Instruction, ProgramError> {
    let (root, _) = derive_name_address(program_id, &get_hashed_name(name), None)?;
    let (funding_state, _) = find_funding_state_address(program_id, &root)?;
    let (entry_list, _) = find_entry_list_address(program_id)?;
    let ix = NameAuctionInstruction::CreateFunding {
        name: name.to_string(),
    };
    ix.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(root, false),
            AccountMeta::new(funding_state, false),
            AccountMeta::new(entry_list, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn add_funding(
    program_id: &Pubkey,
    contributor: &Pubkey,
    amount: u64,
    name: &str,
) -> Result<Instruction, ProgramError> {
    let (root, _) = derive_name_address(program_id, &get_hashed_name(name), None)?;
    let (program_record, _) = find_program_record_address(program_id, &root)?;
    let (funding_state, _) = find_funding_state_address(program_id, &root)?;
    let (vault, _) = find_vault_address(program_id)?;
    let ix = NameAuctionInstruction::AddFunding {
        amount,
        name: name.to_string(),
    };
    ix.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*contributor, true),
            AccountMeta::new_readonly(program_record, false),
            AccountMeta::new(funding_state, false),
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn create_name(
    program_id: &Pubkey,
    payer: &Pubkey,
    name: &str,
    parent: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (name_account, _) = derive_name_address(program_id, &get_hashed_name(name), Some(parent))?;
    let (entry_list, _) = find_entry_list_address(program_id)?;
    let ix = NameAuctionInstruction::CreateName {
        name: name.to_string(),
        parent: *parent,
    };
    ix.into_instruction(
        program_id,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(name_account, false),
            AccountMeta::new(entry_list, false),
            AccountMeta::new_readonly(*parent, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn get_funding_state(program_id: &Pubkey, root: &Pubkey) -> Result<Instruction, ProgramError> {
    let (funding_state, _) = find_funding_state_address(program_id, root)?;
    NameAuctionInstruction::GetFundingState.into_instruction(
        program_id,
        vec![AccountMeta::new_readonly(funding_state, false)],
    )
}

pub fn get_entry_count(program_id: &Pubkey) -> Result<Instruction, ProgramError> {
    let (entry_list, _) = find_entry_list_address(program_id)?;
    NameAuctionInstruction::GetEntryCount.into_instruction(
        program_id,
        vec![AccountMeta::new_readonly(entry_list, false)],
    )
}
