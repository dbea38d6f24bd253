use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::external::JrpcConnection;

use self::models::*;
use super::Transport;

mod models;

/// Ethereum JSON-RPC transport
pub struct JrpcTransport {
    connection: Arc<dyn JrpcConnection>,
    next_id: AtomicU64,
}

impl JrpcTransport {
    pub fn new(connection: Arc<dyn JrpcConnection>) -> Self {
        Self {
            connection,
            next_id: AtomicU64::new(1),
        }
    }

    async fn send<P, T>(&self, method: &str, params: P) -> Result<T>
    where
        P: serde::Serialize,
        T: for<'de> serde::Deserialize<'de>,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::to_string(&JrpcRequest::new(id, method, params))?;
        log::debug!("JRPC request #{id}: {method}");

        let response = self.connection.post(&request).await?;
        let response = serde_json::from_str::<JrpcResponse<T>>(&response)
            .map_err(|_| JrpcError::InvalidResponse)?;

        match (response.result, response.error) {
            (_, Some(error)) => Err(JrpcError::Rpc {
                code: error.code,
                message: error.message,
            }
            .into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(JrpcError::InvalidResponse.into()),
        }
    }
}

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
impl Transport for JrpcTransport {
    async fn call_contract(&self, contract: &str, data: &[u8]) -> Result<Vec<u8>> {
        let call = EthCall { to: contract, data };
        let HexBytes(output) = self.send("eth_call", (call, "latest")).await?;
        Ok(output)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum JrpcError {
    #[error("Failed to parse response")]
    InvalidResponse,
    #[error("JRPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}
