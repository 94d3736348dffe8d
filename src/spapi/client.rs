//! HTTP client for the Selling Partner API using wreq.

use crate::config::{Config, Credentials};
use crate::spapi::marketplace::Marketplace;
use crate::spapi::models::QueryMode;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use wreq::Client;

/// Login-with-Amazon token endpoint.
const LWA_TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";

/// Data facets requested on every catalog query.
const INCLUDED_DATA: &str = "attributes,images,productTypes,relationships,salesRanks";

/// Fixed page size for identifier and keyword searches.
const PAGE_SIZE: u32 = 20;

/// Margin subtracted from the token lifetime so a token is refreshed before
/// it actually expires mid-request.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Trait for catalog search and pricing lookups - enables mocking for tests.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Runs a catalog query and returns the raw item payloads.
    async fn search_items(&self, query: &str, mode: QueryMode) -> Result<Vec<Value>>;

    /// Fetches the competitive-pricing records for one ASIN.
    async fn competitive_pricing(&self, asin: &str) -> Result<Vec<Value>>;

    /// Returns the configured marketplace.
    fn marketplace(&self) -> Marketplace;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// SP-API HTTP client with internal LWA token management.
pub struct SpApiClient {
    client: Client,
    marketplace: Marketplace,
    credentials: Credentials,
    api_base: Option<String>,
    token_url: Option<String>,
    token: Mutex<Option<CachedToken>>,
}

impl SpApiClient {
    /// Creates a new client with the given configuration and credentials.
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        Self::with_base_urls(config, credentials, None, None)
    }

    /// Creates a new client with custom API and token URLs (for testing).
    pub fn with_base_urls(
        config: &Config,
        credentials: Credentials,
        api_base: Option<String>,
        token_url: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            marketplace: config.marketplace,
            credentials,
            api_base,
            token_url,
            token: Mutex::new(None),
        })
    }

    /// Returns the API base URL (custom for testing, or region-based for production).
    fn api_base(&self) -> String {
        self.api_base.clone().unwrap_or_else(|| self.marketplace.endpoint())
    }

    /// Returns the LWA token URL.
    fn token_url(&self) -> String {
        self.token_url.clone().unwrap_or_else(|| LWA_TOKEN_URL.to_string())
    }

    /// Returns a valid access token, exchanging the refresh token when the
    /// cached one is absent or about to expire.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting fresh LWA access token");

        let body = format!(
            "grant_type=refresh_token&refresh_token={}&client_id={}&client_secret={}",
            urlencoding::encode(&self.credentials.refresh_token),
            urlencoding::encode(&self.credentials.lwa_client_id),
            urlencoding::encode(&self.credentials.lwa_client_secret),
        );

        let response = self
            .client
            .post(self.token_url())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Failed to send token request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed with status {}: {}", status, detail);
        }

        let text = response.text().await.context("Failed to read token response")?;
        let payload: TokenResponse =
            serde_json::from_str(&text).context("Failed to decode token response")?;

        let lifetime = payload.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        let access_token = payload.access_token.clone();
        *cached = Some(CachedToken {
            access_token: payload.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(access_token)
    }

    /// Performs an authenticated GET and returns the raw response.
    async fn get(&self, url: &str) -> Result<wreq::Response> {
        let token = self.access_token().await?;

        debug!("GET {}", url);

        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .header("x-amz-access-token", token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request")
    }

    /// Performs an authenticated GET and decodes the JSON body, failing on
    /// any non-success status.
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, detail);
        }

        let body = response.text().await.context("Failed to read response body")?;
        serde_json::from_str(&body).context("Failed to decode response payload")
    }
}

#[async_trait]
impl Catalog for SpApiClient {
    async fn search_items(&self, query: &str, mode: QueryMode) -> Result<Vec<Value>> {
        let base = self.api_base();
        let marketplace_id = self.marketplace.marketplace_id();

        match mode {
            QueryMode::Asin => {
                let url = format!(
                    "{}/catalog/2022-04-01/items/{}?marketplaceIds={}&includedData={}",
                    base,
                    urlencoding::encode(query),
                    marketplace_id,
                    INCLUDED_DATA
                );

                info!("Looking up catalog item: {}", query);
                let response = self.get(&url).await?;

                let status = response.status();
                // An unknown ASIN is an empty result set, not an error.
                if status == 404 {
                    debug!("Catalog item {} not found", query);
                    return Ok(Vec::new());
                }
                if !status.is_success() {
                    let detail = response.text().await.unwrap_or_default();
                    anyhow::bail!("Request failed with status {}: {}", status, detail);
                }

                let body = response.text().await.context("Failed to read response body")?;
                let item: Value =
                    serde_json::from_str(&body).context("Failed to decode response payload")?;

                // Wrapped into a singleton so downstream handling is uniform.
                Ok(vec![item])
            }
            QueryMode::Upc | QueryMode::Keyword => {
                let selector = if mode == QueryMode::Upc {
                    format!("identifiers={}&identifiersType=UPC", urlencoding::encode(query))
                } else {
                    format!("keywords={}", urlencoding::encode(query))
                };
                let url = format!(
                    "{}/catalog/2022-04-01/items?marketplaceIds={}&includedData={}&pageSize={}&{}",
                    base, marketplace_id, INCLUDED_DATA, PAGE_SIZE, selector
                );

                info!("Searching catalog ({}): {}", mode, query);
                let payload = self.get_json(&url).await?;

                let items =
                    payload.get("items").and_then(Value::as_array).cloned().unwrap_or_default();
                Ok(items)
            }
        }
    }

    async fn competitive_pricing(&self, asin: &str) -> Result<Vec<Value>> {
        let url = format!(
            "{}/products/pricing/v0/competitivePrice?Asins={}&ItemType=Asin&MarketplaceId={}",
            self.api_base(),
            urlencoding::encode(asin),
            self.marketplace.marketplace_id()
        );

        info!("Fetching competitive pricing for ASIN: {}", asin);
        let payload = self.get_json(&url).await?;

        let records = payload.get("payload").and_then(Value::as_array).cloned().unwrap_or_default();
        Ok(records)
    }

    fn marketplace(&self) -> Marketplace {
        self.marketplace
    }
}
