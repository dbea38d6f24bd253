use std::fmt;
use std::time::Duration;

use anyhow::Result;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use wallet_widget_utils::*;

pub mod constants {
    use std::time::Duration;

    /// BNB Smart Chain public RPC endpoint
    pub const BSC_RPC: &str = "https://bsc-dataseed.binance.org/";

    /// USDT token contract
    pub const USDT_ADDRESS: &str = "0x55d398326f99059fF775485246999027B3197955";
    pub const USDT_SYMBOL: &str = "USDT";
    pub const USDT_DECIMALS: u8 = 6;

    pub const CURRENCY_SYMBOL: &str = "$";

    /// Local storage key of the connected account
    pub const STORAGE_KEY: &str = "connectedWallet";

    pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_millis(2000);
    pub const COPIED_LABEL: &str = "Скопировано!";

    pub const WALLET_ICON_SIZE: u32 = 200;
    pub const COPY_ICON_SIZE: u32 = 24;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetSettings {
    /// JSON-RPC endpoint of the chain, e.g. `https://bsc-dataseed.binance.org/`
    pub rpc_endpoint: String,
    /// The only token whose balance is displayed
    pub token: TokenSettings,
    /// Prefix of the displayed balance. Default: `$`
    pub currency_symbol: String,
    /// Local storage key of the connected account. Default: `connectedWallet`
    pub storage_key: String,
    /// How long the "copied" indicator stays visible. Default: `2000`
    #[serde(with = "serde_duration_ms")]
    pub copied_indicator_duration: Duration,
    pub copied_label: String,
    pub wallet_icon_size: u32,
    pub copy_icon_size: u32,
}

impl WidgetSettings {
    /// Parses settings overrides, missing fields fall back to defaults
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            rpc_endpoint: constants::BSC_RPC.to_owned(),
            token: Default::default(),
            currency_symbol: constants::CURRENCY_SYMBOL.to_owned(),
            storage_key: constants::STORAGE_KEY.to_owned(),
            copied_indicator_duration: constants::COPIED_INDICATOR_DURATION,
            copied_label: constants::COPIED_LABEL.to_owned(),
            wallet_icon_size: constants::WALLET_ICON_SIZE,
            copy_icon_size: constants::COPY_ICON_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            address: constants::USDT_ADDRESS.to_owned(),
            symbol: constants::USDT_SYMBOL.to_owned(),
            decimals: constants::USDT_DECIMALS,
        }
    }
}

/// Token amount in its smallest units.
///
/// Displayed with exactly `decimals` fractional digits: `1500000` with
/// 6 decimals is `1.500000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    #[serde(with = "serde_string")]
    pub raw: BigUint,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: BigUint, decimals: u8) -> Self {
        Self { raw, decimals }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimals as usize;
        let digits = self.raw.to_string();
        if decimals == 0 {
            return f.write_str(&digits);
        }

        let digits = if digits.len() <= decimals {
            format!("{digits:0>width$}", width = decimals + 1)
        } else {
            digits
        };

        let (int, frac) = digits.split_at(digits.len() - decimals);
        write!(f, "{int}.{frac}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "data")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
