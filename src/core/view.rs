use std::fmt;

use serde::Serialize;

use wallet_widget_utils::shorten_account;

use super::wallet_widget::WidgetSnapshot;
use crate::models::WidgetSettings;

pub const WALLET_ICON_SRC: &str = "icons/MetaMask_Fox.svg";
pub const WALLET_ICON_LABEL: &str = "MetaMask";
pub const COPY_ICON_SRC: &str = "icons/copy.svg";
pub const COPY_ICON_LABEL: &str = "Copy";

/// Everything the host needs to draw the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub wallet_icon: IconView,
    pub control: WalletControl,
    /// Connect request is in progress
    pub connecting: bool,
    pub connect_error: Option<String>,
    pub storage_error: Option<String>,
    /// Present only when connected
    pub details: Option<AccountDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub short_account: String,
    /// Full account, copied on click
    pub account: String,
    pub copy_icon: IconView,
    pub copied: bool,
    pub copied_label: String,
    /// E.g. `$1.500000 USDT`
    pub balance: String,
    /// Balance request is in progress
    pub loading: bool,
    pub balance_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconView {
    pub src: &'static str,
    pub alt: &'static str,
    pub label: Option<&'static str>,
    pub size: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletControl {
    Connect,
    Disconnect,
}

impl WalletControl {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "Connect Wallet",
            Self::Disconnect => "Disconnect Wallet",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            Self::Connect => "connect-button",
            Self::Disconnect => "disconnect-button",
        }
    }
}

pub fn wallet_icon(size: u32) -> IconView {
    IconView {
        src: WALLET_ICON_SRC,
        alt: WALLET_ICON_LABEL,
        label: Some(WALLET_ICON_LABEL),
        size,
    }
}

pub fn copy_icon(size: u32) -> IconView {
    IconView {
        src: COPY_ICON_SRC,
        alt: COPY_ICON_LABEL,
        label: None,
        size,
    }
}

pub fn render(snapshot: &WidgetSnapshot, settings: &WidgetSettings) -> WidgetView {
    let details = snapshot.account.as_ref().map(|account| {
        let balance = match &snapshot.balance {
            Some(balance) => balance.to_string(),
            None => "0".to_owned(),
        };

        AccountDetails {
            short_account: shorten_account(account),
            account: account.clone(),
            copy_icon: copy_icon(settings.copy_icon_size),
            copied: snapshot.copied,
            copied_label: settings.copied_label.clone(),
            balance: format!(
                "{}{} {}",
                settings.currency_symbol, balance, settings.token.symbol
            ),
            loading: snapshot.balance_status.is_pending(),
            balance_error: snapshot.balance_status.error().map(str::to_owned),
        }
    });

    WidgetView {
        wallet_icon: wallet_icon(settings.wallet_icon_size),
        control: if details.is_some() {
            WalletControl::Disconnect
        } else {
            WalletControl::Connect
        },
        connecting: snapshot.connect_status.is_pending(),
        connect_error: snapshot.connect_status.error().map(str::to_owned),
        storage_error: snapshot.storage_error.clone(),
        details,
    }
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<div class="container"><div>"#)?;

        let icon = &self.wallet_icon;
        write!(
            f,
            r#"<div class="metamask-icon" style="width: {size}px; height: {size}px"><img src="{}" alt="{}" class="metamask-fox"/>"#,
            Escaped(icon.src),
            Escaped(icon.alt),
            size = icon.size,
        )?;
        if let Some(label) = icon.label {
            write!(f, r#"<span class="metamask-text">{}</span>"#, Escaped(label))?;
        }
        f.write_str("</div>")?;

        write!(
            f,
            r#"<button class="{}"{}>{}</button>"#,
            self.control.class(),
            if self.connecting { " disabled" } else { "" },
            self.control.label()
        )?;
        for error in [&self.connect_error, &self.storage_error].into_iter().flatten() {
            write!(f, r#"<p class="error-text">{}</p>"#, Escaped(error))?;
        }
        f.write_str("</div><div>")?;

        if let Some(details) = &self.details {
            let icon = &details.copy_icon;
            write!(
                f,
                r#"<p class="connected-account-text">Account: {}<div class="copy-container" style="width: {size}px; height: {size}px"><img src="{}" alt="{}" class="copy-icon"/></div><div class="toast{}">{}</div></p>"#,
                Escaped(&details.short_account),
                Escaped(icon.src),
                Escaped(icon.alt),
                if details.copied { " show" } else { "" },
                Escaped(&details.copied_label),
                size = icon.size,
            )?;

            write!(
                f,
                r#"<p class="balance-text">Balance: <span class="balance-amount">{}</span></p>"#,
                Escaped(&details.balance)
            )?;
            if let Some(error) = &details.balance_error {
                write!(f, r#"<p class="error-text">{}</p>"#, Escaped(error))?;
            }
        }

        f.write_str("</div></div>")
    }
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(|c: char| matches!(c, '<' | '>' | '&' | '"' | '\'')) {
            f.write_str(&rest[..index])?;
            f.write_str(match rest.as_bytes()[index] {
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'&' => "&amp;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &rest[index + 1..];
        }
        f.write_str(rest)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::models::{RequestStatus, TokenAmount};

    const ACCOUNT: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn connected(balance: Option<u64>) -> WidgetSnapshot {
        WidgetSnapshot {
            account: Some(ACCOUNT.to_owned()),
            balance: balance.map(|raw| TokenAmount::new(BigUint::from(raw), 6)),
            ..Default::default()
        }
    }

    #[test]
    fn disconnected_view() {
        let view = render(&WidgetSnapshot::default(), &Default::default());
        assert_eq!(view.control, WalletControl::Connect);
        assert_eq!(view.wallet_icon, wallet_icon(200));
        assert!(view.details.is_none());
        assert!(!view.connecting);

        let html = view.to_string();
        assert!(html.contains(r#"<button class="connect-button">Connect Wallet</button>"#));
        assert!(!html.contains("disconnect-button"));
        assert!(!html.contains("connected-account-text"));
        assert!(!html.contains("balance-text"));
    }

    #[test]
    fn connected_view() {
        let view = render(&connected(Some(1_500_000)), &Default::default());
        assert_eq!(view.control, WalletControl::Disconnect);

        let details = view.details.clone().unwrap();
        assert_eq!(details.short_account, "0x1234...5678");
        assert_eq!(details.account, ACCOUNT);
        assert_eq!(details.copy_icon, copy_icon(24));
        assert_eq!(details.balance, "$1.500000 USDT");
        assert!(!details.copied);

        let html = view.to_string();
        assert!(html.contains(r#"<button class="disconnect-button">Disconnect Wallet</button>"#));
        assert!(html.contains("Account: 0x1234...5678"));
        assert!(html.contains(r#"<div class="toast">Скопировано!</div>"#));
        assert!(html.contains(r#"<span class="balance-amount">$1.500000 USDT</span>"#));
    }

    #[test]
    fn missing_balance_is_zero() {
        let view = render(&connected(None), &Default::default());
        assert_eq!(view.details.unwrap().balance, "$0 USDT");
    }

    #[test]
    fn copied_toast_is_shown() {
        let snapshot = WidgetSnapshot {
            copied: true,
            ..connected(Some(0))
        };
        let html = render(&snapshot, &Default::default()).to_string();
        assert!(html.contains(r#"<div class="toast show">Скопировано!</div>"#));
    }

    #[test]
    fn statuses_are_displayed() {
        let snapshot = WidgetSnapshot {
            connect_status: RequestStatus::Pending,
            ..Default::default()
        };
        let view = render(&snapshot, &Default::default());
        assert!(view.connecting);
        assert!(view.to_string().contains("connect-button\" disabled"));

        let snapshot = WidgetSnapshot {
            balance_status: RequestStatus::Failed("<timeout>".to_owned()),
            ..connected(None)
        };
        let view = render(&snapshot, &Default::default());
        let details = view.details.clone().unwrap();
        assert!(!details.loading);
        assert_eq!(details.balance_error.as_deref(), Some("<timeout>"));
        assert!(view
            .to_string()
            .contains(r#"<p class="error-text">&lt;timeout&gt;</p>"#));
    }

    #[test]
    fn settings_affect_view() {
        let mut settings = WidgetSettings::default();
        settings.currency_symbol = "€".to_owned();
        settings.token.symbol = "USDC".to_owned();
        settings.copied_label = "Copied!".to_owned();
        settings.wallet_icon_size = 100;

        let view = render(&connected(Some(42)), &settings);
        assert_eq!(view.wallet_icon.size, 100);

        let details = view.details.unwrap();
        assert_eq!(details.balance, "€0.000042 USDC");
        assert_eq!(details.copied_label, "Copied!");
    }

    #[test]
    fn storage_error_is_displayed() {
        let snapshot = WidgetSnapshot {
            storage_error: Some("Failed to store connected wallet: denied".to_owned()),
            ..connected(None)
        };
        let view = render(&snapshot, &Default::default());
        assert_eq!(
            view.storage_error.as_deref(),
            Some("Failed to store connected wallet: denied")
        );
        assert!(view
            .to_string()
            .contains(r#"<p class="error-text">Failed to store connected wallet: denied</p>"#));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            Escaped(r#"<a href="x">'&'</a>"#).to_string(),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(Escaped("Скопировано!").to_string(), "Скопировано!");
        assert_eq!(Escaped("a<b>").to_string(), "a&lt;b&gt;");
    }
}
