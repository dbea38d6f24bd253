use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;

use wallet_widget_utils::shorten_account;

use crate::core::token::TokenContract;
use crate::core::view::{self, WidgetView};
use crate::external::{Clipboard, Clock, Storage, Timer, WalletProvider};
use crate::models::{RequestStatus, TokenAmount, WidgetSettings};
use crate::transport::Transport;

/// Collaborators of the widget. The transport is created once by the host
/// and shared with every balance query.
#[derive(Clone)]
pub struct WidgetContext {
    pub provider: Arc<dyn WalletProvider>,
    pub transport: Arc<dyn Transport>,
    pub storage: Arc<dyn Storage>,
    pub clipboard: Arc<dyn Clipboard>,
    pub timer: Arc<dyn Timer>,
    pub clock: Arc<dyn Clock>,
}

/// Host notifications, called after the state has been updated
pub trait WalletWidgetHandler: Send + Sync {
    fn on_account_changed(&self, account: Option<&str>);

    fn on_balance_changed(&self, balance: Option<&TokenAmount>);

    /// Called when the "copied" indicator appears or disappears
    fn on_copied_changed(&self, copied: bool);

    fn on_status_changed(&self, connect: &RequestStatus, balance: &RequestStatus);
}

pub struct WalletWidget {
    context: WidgetContext,
    handler: Arc<dyn WalletWidgetHandler>,
    settings: WidgetSettings,
    token: TokenContract,
    state: Mutex<WidgetState>,
}

impl WalletWidget {
    /// Creates the widget and restores the connected account from storage
    pub fn new(
        context: WidgetContext,
        handler: Arc<dyn WalletWidgetHandler>,
        settings: WidgetSettings,
    ) -> Self {
        let mut storage_error = None;
        let account = match context.storage.get(&settings.storage_key) {
            Ok(account) => account.filter(|account| !account.is_empty()),
            Err(e) => {
                log::warn!("Failed to restore connected wallet: {e:?}");
                storage_error = Some(format!("Failed to restore connected wallet: {e}"));
                None
            }
        };

        if let Some(account) = &account {
            log::debug!("Restored connected wallet {}", shorten_account(account));
        }

        Self {
            token: TokenContract::new(&settings.token),
            context,
            handler,
            settings,
            state: Mutex::new(WidgetState {
                account,
                storage_error,
                ..Default::default()
            }),
        }
    }

    /// Creates the widget and fetches the balance of the restored account
    pub async fn load(
        context: WidgetContext,
        handler: Arc<dyn WalletWidgetHandler>,
        settings: WidgetSettings,
    ) -> Self {
        let widget = Self::new(context, handler, settings);
        widget.update_balance().await;
        widget
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn token(&self) -> &TokenContract {
        &self.token
    }

    pub fn account(&self) -> Option<String> {
        self.state.lock().account.clone()
    }

    pub fn balance(&self) -> Option<TokenAmount> {
        self.state.lock().balance.clone()
    }

    pub fn is_copied(&self) -> bool {
        self.state.lock().copied.is_some()
    }

    /// Time left until the "copied" indicator disappears
    pub fn copied_reset_in(&self) -> Option<Duration> {
        let now = self.context.clock.now_ms_u64();
        match &self.state.lock().copied {
            Some(copied) => Some(Duration::from_millis(copied.until.saturating_sub(now))),
            None => None,
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        let state = self.state.lock();
        WidgetSnapshot {
            account: state.account.clone(),
            balance: state.balance.clone(),
            copied: state.copied.is_some(),
            storage_error: state.storage_error.clone(),
            connect_status: state.connect_status.clone(),
            balance_status: state.balance_status.clone(),
        }
    }

    pub fn render(&self) -> WidgetView {
        view::render(&self.snapshot(), &self.settings)
    }

    /// Requests accounts from the wallet provider and remembers the first one
    pub async fn connect(&self) -> Result<()> {
        self.set_connect_status(RequestStatus::Pending);

        let account = match self.request_account().await {
            Ok(account) => account,
            Err(e) => {
                log::warn!("Failed to connect wallet: {e:?}");
                self.set_connect_status(RequestStatus::Failed(e.to_string()));
                return Err(e);
            }
        };

        let storage_error = match self.context.storage.set(&self.settings.storage_key, &account) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Failed to store connected wallet: {e:?}");
                Some(format!("Failed to store connected wallet: {e}"))
            }
        };
        self.state.lock().storage_error = storage_error;

        log::info!("Wallet connected: {}", shorten_account(&account));
        self.set_connect_status(RequestStatus::Ready);
        self.set_account(Some(account));
        self.update_balance().await;
        Ok(())
    }

    pub fn disconnect(&self) {
        let storage_error = match self.context.storage.remove(&self.settings.storage_key) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Failed to forget connected wallet: {e:?}");
                Some(format!("Failed to forget connected wallet: {e}"))
            }
        };
        self.state.lock().storage_error = storage_error;

        self.set_account(None);
        self.set_connect_status(RequestStatus::Idle);

        log::info!("Wallet disconnected");
    }

    /// Fetches the token balance of the current account.
    ///
    /// Does nothing when disconnected. Results of requests which were
    /// superseded by an account change or a newer request are discarded.
    pub async fn refresh_balance(&self) -> Result<()> {
        let (account, generation) = {
            let mut state = self.state.lock();
            let account = match &state.account {
                Some(account) => account.clone(),
                None => return Ok(()),
            };
            state.generation += 1;
            state.balance_status = RequestStatus::Pending;
            (account, state.generation)
        };
        self.notify_status();

        let result = self
            .token
            .balance_of(self.context.transport.as_ref(), &account)
            .await;

        let mut state = self.state.lock();
        if state.generation != generation || state.account.as_deref() != Some(account.as_str()) {
            drop(state);
            log::debug!("Discarding stale balance of {}", shorten_account(&account));
            return Ok(());
        }

        match result {
            Ok(balance) => {
                log::debug!("Balance of {}: {balance}", shorten_account(&account));
                state.balance = Some(balance.clone());
                state.balance_status = RequestStatus::Ready;
                drop(state);

                self.handler.on_balance_changed(Some(&balance));
                self.notify_status();
                Ok(())
            }
            Err(e) => {
                let error = WalletWidgetError::RpcFailure(e.to_string());
                log::warn!("Failed to fetch balance of {}: {e:?}", shorten_account(&account));
                state.balance_status = RequestStatus::Failed(error.to_string());
                drop(state);

                self.notify_status();
                Err(error.into())
            }
        }
    }

    /// Copies the current account. Returns `false` when disconnected or on failure
    pub async fn copy_account(&self) -> bool {
        match self.account() {
            Some(account) => self.copy_to_clipboard(&account).await,
            None => false,
        }
    }

    /// Writes `text` to the clipboard and shows the "copied" indicator.
    ///
    /// Resolves after the indicator window, when the indicator is hidden
    /// again unless a newer copy has prolonged it. The reset is driven by
    /// the timer alone, the clock only reports the time left.
    pub async fn copy_to_clipboard(&self, text: &str) -> bool {
        if let Err(e) = self.context.clipboard.write_text(text).await {
            let error = WalletWidgetError::ClipboardFailure(e.to_string());
            log::error!("{error}");
            return false;
        }
        log::debug!("Text successfully copied to clipboard");

        let duration = self.settings.copied_indicator_duration;
        let until = self.context.clock.deadline_after(duration);
        let (seq, was_copied) = {
            let mut state = self.state.lock();
            state.copy_seq += 1;
            let seq = state.copy_seq;
            let was_copied = state.copied.replace(CopiedIndicator { seq, until });
            (seq, was_copied.is_some())
        };

        if !was_copied {
            self.handler.on_copied_changed(true);
        }

        self.context.timer.sleep(duration).await;
        self.reset_copied(seq);
        true
    }

    /// Hides the "copied" indicator if its deadline has passed, for hosts
    /// driving their own timers. Returns `true` if it was hidden by this call
    pub fn refresh(&self) -> bool {
        let now = self.context.clock.now_ms_u64();
        let expired = {
            let mut state = self.state.lock();
            let expired = matches!(&state.copied, Some(copied) if copied.until <= now);
            if expired {
                state.copied = None;
            }
            expired
        };

        if expired {
            self.handler.on_copied_changed(false);
        }
        expired
    }

    /// Hides the indicator shown by the copy `seq`, unless a newer copy replaced it
    fn reset_copied(&self, seq: u64) {
        let reset = {
            let mut state = self.state.lock();
            let reset = matches!(&state.copied, Some(copied) if copied.seq == seq);
            if reset {
                state.copied = None;
            }
            reset
        };

        if reset {
            self.handler.on_copied_changed(false);
        }
    }

    async fn request_account(&self) -> Result<String> {
        let accounts = self
            .context
            .provider
            .request_accounts()
            .await
            .map_err(|e| match e.downcast::<WalletWidgetError>() {
                Ok(e) => e,
                Err(e) => WalletWidgetError::ProviderRejected(e.to_string()),
            })?;

        match accounts.into_iter().next() {
            Some(account) if !account.is_empty() => Ok(account),
            _ => Err(WalletWidgetError::NoAccounts.into()),
        }
    }

    async fn update_balance(&self) {
        // NOTE: failures are already logged and stored in the balance status
        self.refresh_balance().await.ok();
    }

    fn set_account(&self, account: Option<String>) {
        let had_balance = {
            let mut state = self.state.lock();
            state.account = account.clone();
            state.generation += 1;
            state.balance_status = RequestStatus::Idle;
            state.balance.take().is_some()
        };

        self.handler.on_account_changed(account.as_deref());
        if had_balance {
            self.handler.on_balance_changed(None);
        }
        self.notify_status();
    }

    fn set_connect_status(&self, status: RequestStatus) {
        self.state.lock().connect_status = status;
        self.notify_status();
    }

    fn notify_status(&self) {
        let (connect, balance) = {
            let state = self.state.lock();
            (state.connect_status.clone(), state.balance_status.clone())
        };
        self.handler.on_status_changed(&connect, &balance);
    }
}

#[derive(Default)]
struct WidgetState {
    account: Option<String>,
    balance: Option<TokenAmount>,
    connect_status: RequestStatus,
    balance_status: RequestStatus,
    /// Last failed write to the account storage
    storage_error: Option<String>,
    /// Visible "copied" indicator
    copied: Option<CopiedIndicator>,
    /// Bumped on every successful copy
    copy_seq: u64,
    /// Bumped on every account change and balance request
    generation: u64,
}

struct CopiedIndicator {
    /// Copy which has shown the indicator
    seq: u64,
    /// Expected reset time, in ms
    until: u64,
}

/// Widget state at some moment, enough to render it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub account: Option<String>,
    pub balance: Option<TokenAmount>,
    pub copied: bool,
    /// The stored account may differ from the connected one
    pub storage_error: Option<String>,
    pub connect_status: RequestStatus,
    pub balance_status: RequestStatus,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletWidgetError {
    #[error("Wallet provider is not available")]
    ProviderUnavailable,
    #[error("Wallet provider rejected the request: {0}")]
    ProviderRejected(String),
    #[error("Wallet provider returned no accounts")]
    NoAccounts,
    #[error("Failed to fetch balance: {0}")]
    RpcFailure(String),
    #[error("Failed to copy text: {0}")]
    ClipboardFailure(String),
}
