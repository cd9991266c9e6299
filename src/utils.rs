//! Utility functions for felt handling.
//!
//! This module provides helper functions for:
//! - Parsing decimal or hex felts into big integers
//! - Comparing and formatting felts
//! - Address validation
//! - Transaction type checks

use alloy_primitives::U256;

use crate::error::{HistoryError, Result};

/// Selector of the ERC-20 `transfer` entry point (`sn_keccak("transfer")`)
pub const TRANSFER_SELECTOR_HEX: &str =
    "0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e";

/// Number of hex digits in an address once `0x`/`0x0` is stripped
pub const ADDRESS_HEX_LENGTH: usize = 63;

pub const TXN_TYPE_DEPLOY: &str = "deploy";
pub const TXN_TYPE_DEPLOY_ACCOUNT: &str = "deploy_account";

/// Parses a felt given as a decimal or `0x`-prefixed hex string.
/// The empty string parses as zero.
pub fn parse_felt(value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(U256::ZERO);
    }

    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    U256::from_str_radix(digits, radix).map_err(|_| HistoryError::InvalidFelt(value.to_string()))
}

/// The transfer selector as a big integer.
pub fn transfer_selector() -> U256 {
    parse_felt(TRANSFER_SELECTOR_HEX).unwrap_or_default()
}

/// True when both values parse and are numerically equal.
pub fn felt_eq(a: &str, b: &str) -> bool {
    match (parse_felt(a), parse_felt(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Hash comparison: numeric when both sides are felts, otherwise exact.
pub fn same_hash(a: &str, b: &str) -> bool {
    match (parse_felt(a), parse_felt(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Canonical unpadded `0x` hex form of a felt.
pub fn to_hex(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Whether an indexer transaction type denotes a deploy, case-insensitively.
pub fn is_deploy_type(txn_type: &str) -> bool {
    txn_type.eq_ignore_ascii_case(TXN_TYPE_DEPLOY)
        || txn_type.eq_ignore_ascii_case(TXN_TYPE_DEPLOY_ACCOUNT)
}

fn address_bound() -> U256 {
    (U256::from(1u64) << 251usize) - U256::from(256u64)
}

/// Validates an account or contract address and returns it zero-padded to 64 hex digits.
///
/// # Arguments
/// * `address` - Address as a hex string, with or without `0x`
/// * `length` - Expected digit count after stripping `0x`/`0x0`
pub fn validate_and_parse_address(address: &str, length: usize) -> Result<String> {
    let trimmed = address.trim();
    let stripped = trimmed
        .strip_prefix("0x0")
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if stripped.len() != length {
        return Err(HistoryError::InvalidAddress(format!(
            "Address {} has an invalid length",
            address
        )));
    }

    let value = U256::from_str_radix(stripped, 16)
        .map_err(|_| HistoryError::InvalidAddress(format!("Address {} is not hex", address)))?;
    if value >= address_bound() {
        return Err(HistoryError::InvalidAddress(format!(
            "Address {} is out of range",
            address
        )));
    }

    Ok(format!("0x{:0>64}", format!("{:x}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_hex_and_empty() {
        assert_eq!(parse_felt("99").unwrap(), U256::from(99u64));
        assert_eq!(parse_felt("0x63").unwrap(), U256::from(99u64));
        assert_eq!(parse_felt("").unwrap(), U256::ZERO);
        assert!(parse_felt("x").is_err());
    }

    #[test]
    fn felt_eq_ignores_representation() {
        assert!(felt_eq("0x0A", "10"));
        assert!(felt_eq("0x000a", "0xa"));
        assert!(!felt_eq("0xa", "0xb"));
        assert!(!felt_eq("x", "x"));
    }

    #[test]
    fn same_hash_falls_back_to_string_equality() {
        assert!(same_hash("0x01", "0x1"));
        assert!(same_hash("abc-hash", "abc-hash"));
        assert!(!same_hash("abc-hash", "abd-hash"));
    }

    #[test]
    fn transfer_selector_matches_constant() {
        assert_eq!(to_hex(transfer_selector()), TRANSFER_SELECTOR_HEX);
    }

    #[test]
    fn deploy_types_are_case_insensitive() {
        assert!(is_deploy_type("DEPLOY"));
        assert!(is_deploy_type("Deploy_Account"));
        assert!(!is_deploy_type("INVOKE"));
        assert!(!is_deploy_type("deployaccount"));
    }

    #[test]
    fn validates_and_pads_addresses() {
        let address = "0x05a98ec9f0ef9ba4e5b7f4ab1fa4aa1f6fe7a9e1d2c3b4a5968778695a4b3c2d";
        let parsed = validate_and_parse_address(address, ADDRESS_HEX_LENGTH).unwrap();
        assert_eq!(parsed, address);

        let unpadded = "0x5a98ec9f0ef9ba4e5b7f4ab1fa4aa1f6fe7a9e1d2c3b4a5968778695a4b3c2d";
        assert_eq!(
            validate_and_parse_address(unpadded, ADDRESS_HEX_LENGTH).unwrap(),
            address
        );
    }

    #[test]
    fn keeps_leading_zero_without_prefix() {
        let digits = "05a98ec9f0ef9ba4e5b7f4ab1fa4aa1f6fe7a9e1d2c3b4a5968778695a4b3c2";
        assert_eq!(digits.len(), ADDRESS_HEX_LENGTH);

        let parsed = validate_and_parse_address(digits, ADDRESS_HEX_LENGTH).unwrap();
        assert_eq!(parsed, format!("0x0{}", digits));
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(
            validate_and_parse_address("0x1234", ADDRESS_HEX_LENGTH),
            Err(HistoryError::InvalidAddress(_))
        ));

        let too_large = format!("0x0{}", "f".repeat(63));
        assert!(matches!(
            validate_and_parse_address(&too_large, ADDRESS_HEX_LENGTH),
            Err(HistoryError::InvalidAddress(_))
        ));
    }
}
