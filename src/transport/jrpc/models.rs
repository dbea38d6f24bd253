use serde::{Deserialize, Serialize};

use wallet_widget_utils::*;

#[derive(Serialize)]
pub struct JrpcRequest<'a, T> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: T,
}

impl<'a, T> JrpcRequest<'a, T> {
    pub fn new(id: u64, method: &'a str, params: T) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Serialize)]
pub struct EthCall<'a> {
    pub to: &'a str,
    #[serde(with = "serde_hex_prefixed")]
    pub data: &'a [u8],
}

#[derive(Deserialize)]
pub struct JrpcResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JrpcResponseError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JrpcResponseError {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(transparent)]
pub struct HexBytes(#[serde(with = "serde_hex_prefixed")] pub Vec<u8>);
