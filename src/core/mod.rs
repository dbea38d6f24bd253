pub use self::token::TokenContract;
pub use self::view::WidgetView;
pub use self::wallet_widget::{
    WalletWidget, WalletWidgetError, WalletWidgetHandler, WidgetContext, WidgetSnapshot,
};

pub mod token;
pub mod view;
pub mod wallet_widget;
