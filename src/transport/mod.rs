use anyhow::Result;

pub mod jrpc;

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
pub trait Transport: Send + Sync {
    /// Executes a read-only contract call against the latest block
    async fn call_contract(&self, contract: &str, data: &[u8]) -> Result<Vec<u8>>;
}
