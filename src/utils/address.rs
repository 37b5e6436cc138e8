use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::models::{ReputationError, Result};

/// Parse a `0x`-prefixed, 20-byte hex address. Case is not checked.
pub fn parse_evm_address(input: &str) -> Result<Address> {
    let address = input.trim();

    if !address.starts_with("0x") || address.len() != 42 {
        return Err(ReputationError::InvalidAddress(address.to_string()));
    }

    let bytes = hex::decode(&address[2..])
        .map_err(|_| ReputationError::InvalidAddress(address.to_string()))?;

    Ok(Address::from_slice(&bytes))
}

/// EIP-55 mixed-case rendering of an address.
pub fn to_checksum_address(input: &str) -> Result<String> {
    let address = parse_evm_address(input)?;
    Ok(to_checksum(&address, None))
}
