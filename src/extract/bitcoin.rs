//! Bitcoin address extraction
//!
//! Finds legacy (P2PKH, `1...`) and script (P2SH, `3...`) addresses in page
//! text and keeps only those whose Base58Check checksum verifies.

use crate::crawler::PageCallback;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::OnceLock;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Decoded length: version byte, 20-byte hash, 4-byte checksum
const ADDRESS_BYTES: usize = 25;

static CANDIDATES: OnceLock<Regex> = OnceLock::new();

/// Base58 runs that could be a P2PKH or P2SH address
fn candidates() -> &'static Regex {
    CANDIDATES.get_or_init(|| {
        Regex::new(r"\b[13][1-9A-HJ-NP-Za-km-z]{25,34}\b")
            .expect("address pattern is a valid regex")
    })
}

/// Page callback returning every valid Bitcoin address on the page
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinAddressCallback;

impl BitcoinAddressCallback {
    pub fn new() -> Self {
        Self
    }

    /// Returns distinct valid addresses in order of first appearance
    pub fn find_addresses(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        candidates()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| is_valid_address(candidate))
            .filter(|candidate| seen.insert(*candidate))
            .map(str::to_string)
            .collect()
    }
}

impl PageCallback<String> for BitcoinAddressCallback {
    fn process(&self, text: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.find_addresses(text))
    }
}

/// Checks the Base58Check encoding of a P2PKH or P2SH address
pub fn is_valid_address(address: &str) -> bool {
    let decoded = match decode_base58(address) {
        Some(bytes) if bytes.len() == ADDRESS_BYTES => bytes,
        _ => return false,
    };

    let (payload, checksum) = decoded.split_at(ADDRESS_BYTES - 4);
    let digest = Sha256::digest(Sha256::digest(payload));
    if &digest[..4] != checksum {
        return false;
    }

    matches!(
        (address.as_bytes()[0], payload[0]),
        (b'1', 0x00) | (b'3', 0x05)
    )
}

/// Decodes a Base58 string into big-endian bytes
fn decode_base58(input: &str) -> Option<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();

    for c in input.bytes() {
        let mut carry = BASE58_ALPHABET.iter().position(|&a| a == c)? as u32;
        for byte in bytes.iter_mut().rev() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    // Each leading '1' encodes a leading zero byte
    let zeros = input.bytes().take_while(|&c| c == b'1').count();
    let mut decoded = vec![0u8; zeros];
    decoded.extend(bytes);
    Some(decoded)
}
