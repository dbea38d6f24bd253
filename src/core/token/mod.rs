use anyhow::Result;
use num_bigint::BigUint;

use crate::models::{TokenAmount, TokenSettings};
use crate::transport::Transport;

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

const WORD_LEN: usize = 32;
const ADDRESS_LEN: usize = 20;

/// ERC20 token contract reference with a fixed `balanceOf` ABI
#[derive(Debug, Clone)]
pub struct TokenContract {
    address: String,
    symbol: String,
    decimals: u8,
}

impl TokenContract {
    pub fn new(settings: &TokenSettings) -> Self {
        Self {
            address: settings.address.clone(),
            symbol: settings.symbol.clone(),
            decimals: settings.decimals,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub async fn balance_of(&self, transport: &dyn Transport, owner: &str) -> Result<TokenAmount> {
        let payload = encode_balance_of(owner)?;
        let output = transport.call_contract(&self.address, &payload).await?;
        let raw = decode_uint256(&output)?;
        Ok(TokenAmount::new(raw, self.decimals))
    }
}

pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>> {
    let owner = parse_address(owner)?;

    let mut payload = Vec::with_capacity(BALANCE_OF_SELECTOR.len() + WORD_LEN);
    payload.extend_from_slice(&BALANCE_OF_SELECTOR);
    payload.extend_from_slice(&[0; WORD_LEN - ADDRESS_LEN]);
    payload.extend_from_slice(&owner);
    Ok(payload)
}

/// Reads the first ABI word of the call output as `uint256`
pub fn decode_uint256(output: &[u8]) -> Result<BigUint> {
    match output.get(..WORD_LEN) {
        Some(word) => Ok(BigUint::from_bytes_be(word)),
        None => Err(TokenError::InvalidResponseLength(output.len()).into()),
    }
}

/// Parses a `0x`-prefixed 20-byte hex address. The checksum case is not verified
pub fn parse_address(address: &str) -> Result<[u8; ADDRESS_LEN]> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or(TokenError::InvalidAddress)?;

    let mut result = [0; ADDRESS_LEN];
    hex::decode_to_slice(hex_part, &mut result).map_err(|_| TokenError::InvalidAddress)?;
    Ok(result)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid address")]
    InvalidAddress,
    #[error("Invalid contract response length: {0}")]
    InvalidResponseLength(usize),
}
