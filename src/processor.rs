use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::{ProgramResult, MAX_PERMITTED_DATA_INCREASE},
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_pack::{IsInitialized, Pack},
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    derivation::{
        derive_name_address, find_entry_list_address, find_funding_state_address,
        find_program_record_address, find_vault_address, get_hashed_name, verify_name_address,
        Digest, SeedMaterial, ENTRY_LIST_SEED, FUNDING_STATE_SEED, VAULT_SEED,
    },
    error::NameAuctionError,
    instruction::NameAuctionInstruction,
    state::{EntryList, FundingState, NameRecord},
    validation::*,
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction: NameAuctionInstruction,
    ) -> ProgramResult {
        match instruction {
            NameAuctionInstruction::InitializeEntryList { capacity } => {
                msg!("Instruction: InitializeEntryList");
                Self::process_initialize_entry_list(program_id, accounts, capacity)
            }
            NameAuctionInstruction::ResizeEntryList { capacity } => {
                msg!("Instruction: ResizeEntryList");
                Self::process_resize_entry_list(program_id, accounts, capacity)
            }
            NameAuctionInstruction::InitializeVault => {
                msg!("Instruction: InitializeVault");
                Self::process_initialize_vault(program_id, accounts)
            }
            NameAuctionInstruction::CreateFunding { name } => {
                msg!("Instruction: CreateFunding");
                Self::process_create_funding(program_id, accounts, name)
            }
            NameAuctionInstruction::AddFunding { amount, name } => {
                msg!("Instruction: AddFunding");
                Self::process_add_funding(program_id, accounts, amount, name)
            }
            NameAuctionInstruction::CreateName { name, parent } => {
                msg!("Instruction: CreateName");
                Self::process_create_name(program_id, accounts, name, parent)
            }
            NameAuctionInstruction::GetFundingState => {
                msg!("Instruction: GetFundingState");
                Self::process_get_funding_state(program_id, accounts)
            }
            NameAuctionInstruction::GetEntryCount => {
                msg!("Instruction: GetEntryCount");
                Self::process_get_entry_count(program_id, accounts)
            }
        }
    }

    fn process_initialize_entry_list(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        capacity: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer = next_account_info(account_info_iter)?;
        let entry_list = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_signer(payer)?;
        check_system_program(system_program)?;

        if capacity == 0 {
            return Err(NameAuctionError::InvalidCapacity.into());
        }

        let (entry_list_key, bump) = find_entry_list_address(program_id)?;
        check_account_key(entry_list, &entry_list_key)?;
        check_unclaimed(entry_list)?;

        create_pda_account(
            payer,
            entry_list,
            system_program,
            program_id,
            EntryList::space(capacity),
            &[ENTRY_LIST_SEED, &[bump]],
        )?;

        msg!("Entry list created with capacity {}", capacity);
        Ok(())
    }

    fn process_resize_entry_list(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        capacity: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer = next_account_info(account_info_iter)?;
        let entry_list = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_signer(payer)?;
        check_system_program(system_program)?;
        check_entry_list(program_id, entry_list)?;

        let old_len = entry_list.data_len();
        let new_len = EntryList::space(capacity);
        if capacity as usize <= EntryList::capacity(&entry_list.data.borrow())
            || new_len.saturating_sub(old_len) > MAX_PERMITTED_DATA_INCREASE
        {
            return Err(NameAuctionError::InvalidCapacity.into());
        }

        let required = Rent::get()?
            .minimum_balance(new_len)
            .saturating_sub(entry_list.lamports());
        if required > 0 {
            invoke(
                &system_instruction::transfer(payer.key, entry_list.key, required),
                &[payer.clone(), entry_list.clone(), system_program.clone()],
            )?;
        }
        entry_list.realloc(new_len, true)?;

        msg!("Entry list resized to capacity {}", capacity);
        Ok(())
    }

    fn process_initialize_vault(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer = next_account_info(account_info_iter)?;
        let vault = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_signer(payer)?;
        check_system_program(system_program)?;

        let (vault_key, bump) = find_vault_address(program_id)?;
        check_account_key(vault, &vault_key)?;
        check_unclaimed(vault)?;

        create_pda_account(
            payer,
            vault,
            system_program,
            program_id,
            0,
            &[VAULT_SEED, &[bump]],
        )?;

        msg!("Vault created at {}", vault_key);
        Ok(())
    }

    fn process_create_funding(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        name: String,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer = next_account_info(account_info_iter)?;
        let name_account = next_account_info(account_info_iter)?;
        let funding_account = next_account_info(account_info_iter)?;
        let entry_list = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_signer(payer)?;
        check_system_program(system_program)?;
        validate_name(&name)?;

        let digest = get_hashed_name(&name);
        let (root_key, seeds) = derive_name_address(program_id, &digest, None)?;
        check_account_key(name_account, &root_key)?;

        let (funding_key, funding_bump) = find_funding_state_address(program_id, &root_key)?;
        check_account_key(funding_account, &funding_key)?;
        check_entry_list(program_id, entry_list)?;

        check_unclaimed(name_account)?;
        check_unclaimed(funding_account)?;

        enter_name(
            program_id,
            payer,
            name_account,
            entry_list,
            system_program,
            digest,
            None,
            &seeds,
        )?;

        create_pda_account(
            payer,
            funding_account,
            system_program,
            program_id,
            FundingState::LEN,
            &[FUNDING_STATE_SEED, root_key.as_ref(), &[funding_bump]],
        )?;
        let funding_state = FundingState {
            root: root_key,
            total: 0,
        };
        FundingState::pack(funding_state, &mut funding_account.data.borrow_mut())?;

        msg!("Funding opened for {} at {}", name, funding_key);
        Ok(())
    }

    fn process_add_funding(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
        name: String,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let contributor = next_account_info(account_info_iter)?;
        let program_record = next_account_info(account_info_iter)?;
        let funding_account = next_account_info(account_info_iter)?;
        let vault = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        validate_amount(amount)?;
        check_signer(contributor)?;
        check_system_program(system_program)?;
        validate_name(&name)?;

        let (root_key, _) = derive_name_address(program_id, &get_hashed_name(&name), None)?;
        let (program_record_key, _) = find_program_record_address(program_id, &root_key)?;
        check_account_key(program_record, &program_record_key)?;

        let (funding_key, _) = find_funding_state_address(program_id, &root_key)?;
        check_account_key(funding_account, &funding_key)?;
        check_program_owned(funding_account, program_id)?;
        check_vault(program_id, vault)?;

        let mut funding_state = FundingState::unpack_unchecked(&funding_account.data.borrow())?;
        if !funding_state.is_initialized() {
            return Err(NameAuctionError::NotFound.into());
        }
        if funding_state.root != root_key {
            return Err(NameAuctionError::InvalidAccountAddress.into());
        }

        let new_total = funding_state
            .total
            .checked_add(amount)
            .ok_or(NameAuctionError::Overflow)?;

        invoke(
            &system_instruction::transfer(contributor.key, vault.key, amount),
            &[contributor.clone(), vault.clone(), system_program.clone()],
        )?;

        funding_state.total = new_total;
        FundingState::pack(funding_state, &mut funding_account.data.borrow_mut())?;
        set_return_data(&new_total.to_le_bytes());

        msg!("Added {} to {}, total {}", amount, name, new_total);
        Ok(())
    }

    fn process_create_name(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        name: String,
        parent: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer = next_account_info(account_info_iter)?;
        let name_account = next_account_info(account_info_iter)?;
        let entry_list = next_account_info(account_info_iter)?;
        let parent_account = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_signer(payer)?;
        check_system_program(system_program)?;
        validate_name(&name)?;

        check_account_key(parent_account, &parent)?;
        check_program_owned(parent_account, program_id)?;
        let parent_record = NameRecord::unpack_unchecked(&parent_account.data.borrow())
            .map_err(|_| NameAuctionError::NotFound)?;
        if !parent_record.is_initialized() {
            return Err(NameAuctionError::NotFound.into());
        }
        verify_name_address(
            program_id,
            &parent_record.digest,
            Some(&parent_record.root),
            parent_record.bump,
            &parent,
        )?;

        let digest = get_hashed_name(&name);
        let (name_key, seeds) = derive_name_address(program_id, &digest, Some(&parent))?;
        check_account_key(name_account, &name_key)?;
        check_entry_list(program_id, entry_list)?;
        check_unclaimed(name_account)?;

        enter_name(
            program_id,
            payer,
            name_account,
            entry_list,
            system_program,
            digest,
            Some(parent),
            &seeds,
        )?;

        Ok(())
    }

    fn process_get_funding_state(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let funding_account = next_account_info(account_info_iter)?;

        check_program_owned(funding_account, program_id)?;
        let funding_state = FundingState::unpack_unchecked(&funding_account.data.borrow())?;
        if !funding_state.is_initialized() {
            return Err(NameAuctionError::NotFound.into());
        }

        let (funding_key, _) = find_funding_state_address(program_id, &funding_state.root)?;
        check_account_key(funding_account, &funding_key)?;

        set_return_data(&funding_state.total.to_le_bytes());
        Ok(())
    }

    fn process_get_entry_count(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let entry_list = next_account_info(account_info_iter)?;

        check_entry_list(program_id, entry_list)?;
        let count = EntryList::count(&entry_list.data.borrow())?;

        set_return_data(&count.to_le_bytes());
        Ok(())
    }
}

fn check_entry_list(program_id: &Pubkey, entry_list: &AccountInfo) -> ProgramResult {
    let (entry_list_key, _) = find_entry_list_address(program_id)?;
    check_account_key(entry_list, &entry_list_key)?;
    if entry_list.owner != program_id || entry_list.data_len() < EntryList::HEADER_LEN {
        return Err(NameAuctionError::NotInitialized.into());
    }
    Ok(())
}

fn check_vault(program_id: &Pubkey, vault: &AccountInfo) -> ProgramResult {
    let (vault_key, _) = find_vault_address(program_id)?;
    check_account_key(vault, &vault_key)?;
    if vault.owner != program_id {
        return Err(NameAuctionError::NotInitialized.into());
    }
    Ok(())
}

/// Creates a program-owned account at a derived address. Anyone can send
/// lamports to an address before it is claimed, so a non-zero balance only
/// gets topped up to rent exemption before it is allocated and assigned.
fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    program_id: &Pubkey,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let rent_exempt = Rent::get()?.minimum_balance(space);
    if new_account.lamports() == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                rent_exempt,
                space as u64,
                program_id,
            ),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[signer_seeds],
        );
    }

    let shortfall = rent_exempt.saturating_sub(new_account.lamports());
    if shortfall > 0 {
        invoke(
            &system_instruction::transfer(payer.key, new_account.key, shortfall),
            &[payer.clone(), new_account.clone(), system_program.clone()],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(new_account.key, space as u64),
        &[new_account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account.key, program_id),
        &[new_account.clone(), system_program.clone()],
        &[signer_seeds],
    )
}

/// Creates the name record at its derived address and appends it to the
/// entry list. Callers have already checked the address and that it is free.
#[allow(clippy::too_many_arguments)]
fn enter_name<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    name_account: &AccountInfo<'a>,
    entry_list: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    digest: Digest,
    root: Option<Pubkey>,
    seeds: &SeedMaterial,
) -> ProgramResult {
    let count = EntryList::append(&mut entry_list.data.borrow_mut(), name_account.key)?;

    create_pda_account(
        payer,
        name_account,
        system_program,
        program_id,
        NameRecord::LEN,
        &seeds.signer_seeds(),
    )?;
    let record = NameRecord {
        digest,
        root: root.unwrap_or_default(),
        bump: seeds.bump(),
    };
    NameRecord::pack(record, &mut name_account.data.borrow_mut())?;

    msg!("Name entered at {} ({} entries)", name_account.key, count);
    Ok(())
}
