use std::time::Duration;

use anyhow::Result;

pub use wallet_widget_utils::{Clock, SimpleClock};

/// Browser-local key-value store (e.g. `window.localStorage`)
pub trait Storage: Sync + Send {
    /// Retrieve data from storage
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Upsert data into storage
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove data from storage. Removing a missing key is a no-op
    fn remove(&self, key: &str) -> Result<()>;
}

/// Injected wallet provider (EIP-1193)
#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
pub trait WalletProvider: Send + Sync {
    /// Asks the user to expose their accounts (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<String>>;
}

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
pub trait JrpcConnection: Send + Sync {
    async fn post(&self, data: &str) -> Result<String>;
}

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
