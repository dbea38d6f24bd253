use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{IntoUrl, Url};

pub struct JrpcClient {
    client: reqwest::Client,
    url: Url,
}

impl JrpcClient {
    pub fn new<U: IntoUrl>(endpoint: U) -> Result<Arc<Self>> {
        let url = endpoint.into_url()?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        log::debug!("Created JRPC client for {url}");
        Ok(Arc::new(Self { client, url }))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
impl wallet_widget::external::JrpcConnection for JrpcClient {
    async fn post(&self, data: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url.clone())
            .body(data.to_owned())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
