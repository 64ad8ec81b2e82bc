//! OZON Seller API client

use serde::{Deserialize, Serialize};

use crate::config::OzonConfig;
use crate::error::Result;
use crate::http;

/// OZON Seller API base URL
const OZON_API_URL: &str = "https://api-seller.ozon.ru";

/// Products per catalog page (API maximum).
const PRODUCT_LIST_PAGE: i64 = 1000;

/// Offers per stock update request (API maximum).
pub const STOCKS_CHUNK: usize = 100;

/// Offers per price update request (API maximum).
pub const PRICES_CHUNK: usize = 1000;

/// HTTP client for the OZON Seller API.
pub struct OzonClient {
    http: reqwest::Client,
    pub(crate) base_url: String,
    client_id: String,
    api_key: String,
}

impl OzonClient {
    pub fn new(http: reqwest::Client, config: &OzonConfig) -> Self {
        Self {
            http,
            base_url: OZON_API_URL.to_string(),
            client_id: config.client_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Lists every offer id in the seller's catalog, following the cursor
    /// pagination of `/v3/product/list`.
    pub async fn fetch_offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut last_id = String::new();

        loop {
            let page = self.fetch_product_page(&last_id).await?;
            let total = page.total;
            let fetched = page.items.len();
            last_id = page.last_id;
            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));

            log::debug!("Fetched {}/{} OZON catalog entries", offer_ids.len(), total);
            if fetched == 0 || offer_ids.len() as i64 >= total || last_id.is_empty() {
                break;
            }
        }

        log::info!("OZON catalog: {} offers", offer_ids.len());
        Ok(offer_ids)
    }

    async fn fetch_product_page(&self, last_id: &str) -> Result<ProductListResult> {
        let url = format!("{}/v3/product/list", self.base_url);
        let body = ProductListRequest {
            filter: ProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: last_id.to_string(),
            limit: PRODUCT_LIST_PAGE,
        };

        let response = self
            .http
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = http::ensure_status(response).await?;
        let parsed: ProductListResponse = http::read_json(response).await?;
        Ok(parsed.result)
    }

    /// Pushes one batch of stock counts via `/v1/product/import/stocks`.
    pub async fn update_stocks(&self, stocks: &[StockUpdate]) -> Result<()> {
        let url = format!("{}/v1/product/import/stocks", self.base_url);
        log::debug!("Pushing {} stock entries to OZON", stocks.len());

        let response = self
            .http
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&StocksRequest { stocks })
            .send()
            .await?;

        http::ensure_accepted(response).await
    }

    /// Pushes one batch of prices via `/v1/product/import/prices`.
    pub async fn update_prices(&self, prices: &[PriceUpdate]) -> Result<()> {
        let url = format!("{}/v1/product/import/prices", self.base_url);
        log::debug!("Pushing {} price entries to OZON", prices.len());

        let response = self
            .http
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&PricesRequest { prices })
            .send()
            .await?;

        http::ensure_accepted(response).await
    }
}

/// New stock count for one offer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockUpdate {
    pub offer_id: String,
    pub stock: u32,
}

/// New price for one offer, in the shape `/v1/product/import/prices` expects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceUpdate {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

impl PriceUpdate {
    pub fn new(offer_id: &str, price: u64) -> Self {
        Self {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: "RUB".to_string(),
            offer_id: offer_id.to_string(),
            old_price: "0".to_string(),
            price: price.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductListRequest {
    filter: ProductListFilter,
    last_id: String,
    limit: i64,
}

#[derive(Debug, Serialize)]
struct ProductListFilter {
    visibility: String,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListResult,
}

#[derive(Debug, Deserialize)]
struct ProductListResult {
    items: Vec<ProductListItem>,
    total: i64,
    last_id: String,
}

#[derive(Debug, Deserialize)]
struct ProductListItem {
    offer_id: String,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    stocks: &'a [StockUpdate],
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    prices: &'a [PriceUpdate],
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
