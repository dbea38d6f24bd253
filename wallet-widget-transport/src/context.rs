use std::sync::Arc;

use anyhow::Result;
use wallet_widget::core::WidgetContext;
use wallet_widget::external::{Clipboard, SimpleClock, Storage, WalletProvider};
use wallet_widget::models::WidgetSettings;
use wallet_widget::transport::jrpc::JrpcTransport;
use wallet_widget::transport::Transport;

use crate::{JrpcClient, TokioTimer};

/// Creates the RPC transport bound to `settings.rpc_endpoint`
pub fn make_transport(settings: &WidgetSettings) -> Result<Arc<dyn Transport>> {
    let client = JrpcClient::new(settings.rpc_endpoint.as_str())?;
    Ok(Arc::new(JrpcTransport::new(client)))
}

/// Widget collaborators for native hosts. The RPC transport is created
/// once here and shared by every balance request of the widget.
pub fn native_context(
    settings: &WidgetSettings,
    provider: Arc<dyn WalletProvider>,
    storage: Arc<dyn Storage>,
    clipboard: Arc<dyn Clipboard>,
) -> Result<WidgetContext> {
    Ok(WidgetContext {
        provider,
        transport: make_transport(settings)?,
        storage,
        clipboard,
        timer: Arc::new(TokioTimer),
        clock: Arc::new(SimpleClock),
    })
}
