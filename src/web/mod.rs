//! Browser implementations of the widget collaborators.
//!
//! Every call looks up `window` again, so the types hold no JS handles.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::core::{WalletWidgetError, WidgetContext};
use crate::external::{Clipboard, JrpcConnection, SimpleClock, Storage, Timer, WalletProvider};
use crate::models::WidgetSettings;
use crate::transport::jrpc::JrpcTransport;

impl WidgetContext {
    /// Browser collaborators. The RPC transport is bound to
    /// `settings.rpc_endpoint` once and shared by every balance request.
    pub fn web(settings: &WidgetSettings) -> Self {
        let connection = Arc::new(FetchConnection::new(settings.rpc_endpoint.as_str()));
        Self {
            provider: Arc::new(InjectedProvider),
            transport: Arc::new(JrpcTransport::new(connection)),
            storage: Arc::new(LocalStorage),
            clipboard: Arc::new(NavigatorClipboard),
            timer: Arc::new(GlooTimer),
            clock: Arc::new(SimpleClock),
        }
    }
}

/// `window.localStorage`
#[derive(Debug, Copy, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        window()?
            .local_storage()
            .map_err(|e| WebError::Js(js_error(&e)))?
            .ok_or_else(|| WebError::Unavailable("localStorage").into())
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| WebError::Js(js_error(&e)).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| WebError::Js(js_error(&e)).into())
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| WebError::Js(js_error(&e)).into())
    }
}

/// EIP-1193 provider injected as `window.ethereum`
#[derive(Debug, Copy, Clone, Default)]
pub struct InjectedProvider;

impl InjectedProvider {
    const INJECTION_KEY: &'static str = "ethereum";

    async fn request(&self, method: &str) -> Result<JsValue> {
        let window = window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str(Self::INJECTION_KEY))
            .map_err(|_| WalletWidgetError::ProviderUnavailable)?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return Err(WalletWidgetError::ProviderUnavailable.into());
        }

        let request = Reflect::get(&ethereum, &JsValue::from_str("request"))
            .ok()
            .and_then(|request| request.dyn_into::<Function>().ok())
            .ok_or(WalletWidgetError::ProviderUnavailable)?;

        let args = js_sys::Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| WebError::Js(js_error(&e)))?;

        let result = request
            .call1(&ethereum, &args)
            .map_err(|e| WalletWidgetError::ProviderRejected(js_error(&e)))?;
        let promise = result
            .dyn_into::<Promise>()
            .map_err(|_| WebError::Js("provider returned no promise".to_owned()))?;

        JsFuture::from(promise)
            .await
            .map_err(|e| WalletWidgetError::ProviderRejected(js_error(&e)).into())
    }
}

#[async_trait::async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        let accounts = self.request("eth_requestAccounts").await?;
        if !Array::is_array(&accounts) {
            return Err(WebError::Js("accounts list expected".to_owned()).into());
        }

        Ok(Array::from(&accounts)
            .iter()
            .filter_map(|account| account.as_string())
            .collect())
    }
}

/// `navigator.clipboard`
#[derive(Debug, Copy, Clone, Default)]
pub struct NavigatorClipboard;

#[async_trait::async_trait(?Send)]
impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let promise = window()?.navigator().clipboard().write_text(text);
        JsFuture::from(promise)
            .await
            .map_err(|e| WebError::Js(js_error(&e)))?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct GlooTimer;

#[async_trait::async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await
    }
}

/// JSON-RPC over `window.fetch`
#[derive(Debug, Clone)]
pub struct FetchConnection {
    endpoint: String,
}

impl FetchConnection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait(?Send)]
impl JrpcConnection for FetchConnection {
    async fn post(&self, data: &str) -> Result<String> {
        let window = window()?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(|e| WebError::Js(js_error(&e)))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| WebError::Js(js_error(&e)))?;
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(data));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts)
            .map_err(|e| WebError::Js(js_error(&e)))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| WebError::Js(js_error(&e)))?
            .dyn_into()
            .map_err(|e| WebError::Js(js_error(&e)))?;

        if !response.ok() {
            return Err(WebError::Http(response.status()).into());
        }

        let text = response.text().map_err(|e| WebError::Js(js_error(&e)))?;
        JsFuture::from(text)
            .await
            .map_err(|e| WebError::Js(js_error(&e)))?
            .as_string()
            .ok_or_else(|| WebError::Js("response body is not a string".to_owned()).into())
    }
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| WebError::Unavailable("window").into())
}

/// Extracts `message` from JS errors, falling back to the debug representation
fn js_error(value: &JsValue) -> String {
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

#[derive(thiserror::Error, Debug)]
enum WebError {
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("{0}")]
    Js(String),
    #[error("HTTP error {0}")]
    Http(u16),
}
