//! Node addresses derived from public keys.
//!
//! `isc_` followed by base58(public_key ‖ checksum), where the checksum is
//! the first four bytes of `sha256("isc_" ‖ public_key)`. Ballots accept any
//! well-formed [`Address`]; derived addresses just make the key binding
//! checkable.

use isaac_types::{Address, PublicKey, TypeError};

const PREFIX: &str = "isc_";
const CHECKSUM_LEN: usize = 4;
const PAYLOAD_LEN: usize = 32 + CHECKSUM_LEN;

fn checksum(public_key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let digest = crate::sha256_multi(&[PREFIX.as_bytes(), public_key]);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest.as_bytes()[..CHECKSUM_LEN]);
    out
}

/// Derive the `isc_` address of `public_key`.
pub fn derive_address(public_key: &PublicKey) -> Result<Address, TypeError> {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..32].copy_from_slice(public_key.as_bytes());
    payload[32..].copy_from_slice(&checksum(public_key.as_bytes()));
    Address::new(format!("{PREFIX}{}", bs58::encode(payload).into_string()))
}

/// Recover the public key behind a derived address.
///
/// `None` if the address was not derived by [`derive_address`] or its
/// checksum is wrong.
pub fn decode_address(address: &str) -> Option<PublicKey> {
    let payload = bs58::decode(address.strip_prefix(PREFIX)?).into_vec().ok()?;
    if payload.len() != PAYLOAD_LEN {
        return None;
    }
    let (key, sum) = payload.split_at(32);
    let key: [u8; 32] = key.try_into().ok()?;
    (sum == checksum(&key)).then_some(PublicKey(key))
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}

/// Whether `address` is the derived address of `public_key`.
pub fn is_address_of(address: &Address, public_key: &PublicKey) -> bool {
    decode_address(address.as_str()).as_ref() == Some(public_key)
}
