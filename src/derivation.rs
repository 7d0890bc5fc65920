//! Name hashing and program-derived address derivation.
//!
//! Everything here is pure: the program uses it to check the accounts it is
//! handed, and clients use the very same functions to predict those accounts
//! without asking anyone.

use solana_program::{
    hash::hashv,
    program_error::ProgramError,
    pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN},
};

use crate::error::NameAuctionError;

/// Domain separation prefix mixed into every name hash.
pub const HASH_PREFIX: &str = "WEB3 Name Service";

pub const FUNDING_STATE_SEED: &[u8] = b"auction-funding";
pub const ENTRY_LIST_SEED: &[u8] = b"auction-entry-list";
pub const VAULT_SEED: &[u8] = b"auction-vault";

pub type Digest = [u8; 32];

/// SHA-256 of `HASH_PREFIX ‖ name`. No normalization is applied.
pub fn get_hashed_name(name: &str) -> Digest {
    hashv(&[HASH_PREFIX.as_bytes(), name.as_bytes()]).to_bytes()
}

/// Splits `bytes` into consecutive seeds of at most `MAX_SEED_LEN` bytes.
/// The last seed keeps its natural length.
pub fn seed_chunks(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.chunks(MAX_SEED_LEN).collect()
}

/// `digest ‖ root`, with the all-zero key standing in for "no root".
pub fn name_seed_bytes(digest: &Digest, root: Option<&Pubkey>) -> Vec<u8> {
    let root = root.copied().unwrap_or_default();
    let mut bytes = Vec::with_capacity(digest.len() + root.as_ref().len());
    bytes.extend_from_slice(digest);
    bytes.extend_from_slice(root.as_ref());
    bytes
}

/// Seeds that prove a name address derivation, together with the bump that
/// was found for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedMaterial {
    bytes: Vec<u8>,
    bump: u8,
}

impl SeedMaterial {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bump(&self) -> u8 {
        self.bump
    }

    pub fn chunks(&self) -> Vec<&[u8]> {
        seed_chunks(&self.bytes)
    }

    /// Chunks followed by the single byte bump seed, ready for `invoke_signed`.
    pub fn signer_seeds(&self) -> Vec<&[u8]> {
        let mut seeds = self.chunks();
        seeds.push(std::slice::from_ref(&self.bump));
        seeds
    }

    /// Flat `chunks ‖ bump` encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = self.bytes.clone();
        out.push(self.bump);
        out
    }
}

fn search_bump(program_id: &Pubkey, chunks: &[&[u8]]) -> Result<(Pubkey, u8), NameAuctionError> {
    if chunks.len() >= MAX_SEEDS || chunks.iter().any(|c| c.len() > MAX_SEED_LEN) {
        return Err(NameAuctionError::DerivationExhausted);
    }
    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut seeds = chunks.to_vec();
        seeds.push(&bump_seed);
        if let Ok(address) = Pubkey::create_program_address(&seeds, program_id) {
            return Ok((address, bump));
        }
    }
    Err(NameAuctionError::DerivationExhausted)
}

/// Derives the account address of a name digest, optionally scoped under a
/// parent address. Bumps are tried from 255 downwards.
pub fn derive_name_address(
    program_id: &Pubkey,
    digest: &Digest,
    root: Option<&Pubkey>,
) -> Result<(Pubkey, SeedMaterial), NameAuctionError> {
    let bytes = name_seed_bytes(digest, root);
    let (address, bump) = search_bump(program_id, &seed_chunks(&bytes))?;
    Ok((address, SeedMaterial { bytes, bump }))
}

/// Recomputes a name address from a known bump, without searching.
pub fn verify_name_address(
    program_id: &Pubkey,
    digest: &Digest,
    root: Option<&Pubkey>,
    bump: u8,
    expected: &Pubkey,
) -> Result<(), ProgramError> {
    let bytes = name_seed_bytes(digest, root);
    let bump_seed = [bump];
    let mut seeds = seed_chunks(&bytes);
    seeds.push(&bump_seed);
    let address = Pubkey::create_program_address(&seeds, program_id)
        .map_err(|_| NameAuctionError::InvalidAccountAddress)?;
    if address != *expected {
        return Err(NameAuctionError::InvalidAccountAddress.into());
    }
    Ok(())
}

/// Address of `name`, hashed and derived in one step.
pub fn lookup_address(
    program_id: &Pubkey,
    name: &str,
    root: Option<&Pubkey>,
) -> Result<Pubkey, NameAuctionError> {
    derive_name_address(program_id, &get_hashed_name(name), root).map(|(address, _)| address)
}

/// The record kept under the program's own identity for a root name. It is a
/// separate scope from the root address itself: the digest is that of the
/// program id, and the root address becomes the parent.
pub fn find_program_record_address(
    program_id: &Pubkey,
    root: &Pubkey,
) -> Result<(Pubkey, SeedMaterial), NameAuctionError> {
    let digest = get_hashed_name(&program_id.to_string());
    derive_name_address(program_id, &digest, Some(root))
}

pub fn find_funding_state_address(
    program_id: &Pubkey,
    root: &Pubkey,
) -> Result<(Pubkey, u8), NameAuctionError> {
    Pubkey::try_find_program_address(&[FUNDING_STATE_SEED, root.as_ref()], program_id)
        .ok_or(NameAuctionError::DerivationExhausted)
}

pub fn find_entry_list_address(program_id: &Pubkey) -> Result<(Pubkey, u8), NameAuctionError> {
    Pubkey::try_find_program_address(&[ENTRY_LIST_SEED], program_id)
        .ok_or(NameAuctionError::DerivationExhausted)
}

/// Single vault that receives every contribution, for all roots.
pub fn find_vault_address(program_id: &Pubkey) -> Result<(Pubkey, u8), NameAuctionError> {
    Pubkey::try_find_program_address(&[VAULT_SEED], program_id)
        .ok_or(NameAuctionError::DerivationExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let root = Pubkey::new_unique();
        let digest = get_hashed_name("web3");

        let first = derive_name_address(&program_id, &digest, Some(&root)).unwrap();
        let second = derive_name_address(&program_id, &digest, Some(&root)).unwrap();
        assert_eq!(first, second);

        let unrooted = derive_name_address(&program_id, &digest, None).unwrap();
        assert_ne!(first.0, unrooted.0);
    }

    #[test]
    fn no_root_matches_default_key() {
        let program_id = Pubkey::new_unique();
        let digest = get_hashed_name("web3");
        let none = derive_name_address(&program_id, &digest, None).unwrap();
        let zero = derive_name_address(&program_id, &digest, Some(&Pubkey::default())).unwrap();
        assert_eq!(none, zero);
    }

    #[test]
    fn derived_address_is_off_curve() {
        let program_id = Pubkey::new_unique();
        let (address, _) = derive_name_address(&program_id, &get_hashed_name("web3"), None).unwrap();
        assert!(!address.is_on_curve());
    }

    #[test]
    fn hash_is_prefixed() {
        let plain = hashv(&[b"web3"]).to_bytes();
        assert_ne!(get_hashed_name("web3"), plain);

        let joined = hashv(&[format!("{}web3", HASH_PREFIX).as_bytes()]).to_bytes();
        assert_eq!(get_hashed_name("web3"), joined);
    }

    #[test]
    fn distinct_names_hash_apart() {
        let digests: HashSet<Digest> = (0..1000)
            .map(|i| get_hashed_name(&format!("name-{}", i)))
            .collect();
        assert_eq!(digests.len(), 1000);
    }

    #[test]
    fn chunk_count_and_tail_length() {
        for len in 0..=100usize {
            let bytes = vec![7u8; len];
            let chunks = seed_chunks(&bytes);
            assert_eq!(chunks.len(), (len + MAX_SEED_LEN - 1) / MAX_SEED_LEN);
            if len > 0 {
                let tail = match len % MAX_SEED_LEN {
                    0 => MAX_SEED_LEN,
                    rem => rem,
                };
                assert_eq!(chunks.last().unwrap().len(), tail);
                assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == MAX_SEED_LEN));
            }
        }
    }

    #[test]
    fn signer_seeds_reproduce_address() {
        let program_id = Pubkey::new_unique();
        let root = Pubkey::new_unique();
        let (address, seeds) =
            derive_name_address(&program_id, &get_hashed_name("child"), Some(&root)).unwrap();

        assert_eq!(seeds.bytes().len(), 64);
        assert_eq!(seeds.chunks().len(), 2);
        assert_eq!(seeds.to_vec().len(), 65);
        assert_eq!(*seeds.to_vec().last().unwrap(), seeds.bump());

        let recomputed = Pubkey::create_program_address(&seeds.signer_seeds(), &program_id).unwrap();
        assert_eq!(recomputed, address);
    }

    #[test]
    fn verify_with_stored_bump() {
        let program_id = Pubkey::new_unique();
        let digest = get_hashed_name("web3");
        let (address, seeds) = derive_name_address(&program_id, &digest, None).unwrap();

        assert!(verify_name_address(&program_id, &digest, None, seeds.bump(), &address).is_ok());
        assert!(verify_name_address(
            &program_id,
            &get_hashed_name("web4"),
            None,
            seeds.bump(),
            &address
        )
        .is_err());
    }

    #[test]
    fn scopes_do_not_collapse() {
        let program_id = Pubkey::new_unique();
        let root = lookup_address(&program_id, "web3", None).unwrap();
        let (record, _) = find_program_record_address(&program_id, &root).unwrap();
        let (funding, _) = find_funding_state_address(&program_id, &root).unwrap();
        let (list, _) = find_entry_list_address(&program_id).unwrap();
        let (vault, _) = find_vault_address(&program_id).unwrap();

        let all: HashSet<Pubkey> = [root, record, funding, list, vault].into_iter().collect();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn program_identity_changes_address() {
        let a = lookup_address(&Pubkey::new_unique(), "web3", None).unwrap();
        let b = lookup_address(&Pubkey::new_unique(), "web3", None).unwrap();
        assert_ne!(a, b);
    }
}
