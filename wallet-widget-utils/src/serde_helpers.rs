use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::Error;
use serde::{Deserialize, Serialize};

struct StringOrNumber(u64);

impl Serialize for StringOrNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0 <= 0x1fffffffffffffu64 || !serializer.is_human_readable() {
            serializer.serialize_u64(self.0)
        } else {
            serializer.serialize_str(&self.0.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for StringOrNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Value<'a> {
            String(#[serde(borrow)] Cow<'a, str>),
            Number(u64),
        }

        match Value::deserialize(deserializer)? {
            Value::String(str) => u64::from_str(str.as_ref())
                .map(Self)
                .map_err(|_| D::Error::custom("Invalid number")),
            Value::Number(value) => Ok(Self(value)),
        }
    }
}

pub mod serde_duration_ms {
    use super::*;

    pub fn serialize<S>(data: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        StringOrNumber(data.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StringOrNumber::deserialize(deserializer).map(|StringOrNumber(x)| Duration::from_millis(x))
    }
}

pub mod serde_string {
    use super::*;

    pub fn serialize<S>(data: &dyn fmt::Display, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        data.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: FromStr,
        T::Err: fmt::Display,
    {
        String::deserialize(deserializer)
            .and_then(|data| T::from_str(&data).map_err(D::Error::custom))
    }
}

/// `0x`-prefixed hex string, as used by Ethereum JSON-RPC
pub mod serde_hex_prefixed {
    use super::*;

    pub fn serialize<S>(data: &dyn AsRef<[u8]>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        encode_hex_prefixed(data.as_ref()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Cow::<str>::deserialize(deserializer)?;
        decode_hex_prefixed(&data).map_err(D::Error::custom)
    }
}

pub fn encode_hex_prefixed(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decodes a `0x`-prefixed hex string. The prefix is optional and
/// odd-length quantities (e.g. `0x0`) are left-padded.
pub fn decode_hex_prefixed(data: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let data = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);

    if data.len() % 2 == 1 {
        hex::decode(format!("0{data}"))
    } else {
        hex::decode(data)
    }
}
