//! Yandex Market partner API client

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MarketConfig;
use crate::error::Result;
use crate::http;

use super::DeliveryScheme;

/// Yandex Market partner API base URL
const MARKET_API_URL: &str = "https://api.partner.market.yandex.ru";

/// Catalog entries per page (API maximum).
const CATALOG_PAGE_LIMIT: u32 = 200;

/// Offers per stock update request.
pub const STOCKS_CHUNK: usize = 2000;

/// Offers per price update request.
pub const PRICES_CHUNK: usize = 500;

/// HTTP client bound to one Market campaign.
pub struct MarketClient {
    http: reqwest::Client,
    pub(crate) base_url: String,
    token: String,
    campaign_id: String,
    warehouse_id: i64,
    scheme: DeliveryScheme,
}

impl MarketClient {
    /// Creates a client for the campaign serving the given delivery scheme.
    pub fn new(http: reqwest::Client, config: &MarketConfig, scheme: DeliveryScheme) -> Self {
        let campaign = match scheme {
            DeliveryScheme::Fbs => &config.fbs,
            DeliveryScheme::Dbs => &config.dbs,
        };
        Self {
            http,
            base_url: MARKET_API_URL.to_string(),
            token: config.token.clone(),
            campaign_id: campaign.campaign_id.clone(),
            warehouse_id: campaign.warehouse_id,
            scheme,
        }
    }

    pub fn scheme(&self) -> DeliveryScheme {
        self.scheme
    }

    /// Lists every shop SKU in the campaign catalog, following the
    /// page-token pagination of `offer-mapping-entries`.
    pub async fn fetch_offer_ids(&self) -> Result<Vec<String>> {
        let mut skus = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = match &page_token {
                Some(token) => format!(
                    "{}/campaigns/{}/offer-mapping-entries?limit={}&page_token={}",
                    self.base_url, self.campaign_id, CATALOG_PAGE_LIMIT, token
                ),
                None => format!(
                    "{}/campaigns/{}/offer-mapping-entries?limit={}",
                    self.base_url, self.campaign_id, CATALOG_PAGE_LIMIT
                ),
            };

            let response = self
                .http
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.token))
                .send()
                .await?;

            let response = http::ensure_status(response).await?;
            let parsed: OfferMappingsResponse = http::read_json(response).await?;

            skus.extend(
                parsed
                    .result
                    .offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );

            page_token = parsed.result.paging.and_then(|p| p.next_page_token);
            if page_token.is_none() {
                break;
            }
        }

        log::info!(
            "Market {} catalog: {} offers",
            self.scheme.as_str(),
            skus.len()
        );
        Ok(skus)
    }

    /// Builds the stock payload entry for one offer, stamped with the
    /// campaign's warehouse and the current time.
    pub fn stock_entry(&self, shop_sku: &str, count: u32) -> SkuStock {
        SkuStock {
            sku: shop_sku.to_string(),
            warehouse_id: self.warehouse_id,
            items: vec![StockItem {
                count,
                item_type: "FIT".to_string(),
                updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            }],
        }
    }

    /// Pushes one batch of stock counts via `offers/stocks`.
    pub async fn update_stocks(&self, skus: &[SkuStock]) -> Result<()> {
        let url = format!(
            "{}/campaigns/{}/offers/stocks",
            self.base_url, self.campaign_id
        );
        log::debug!(
            "Pushing {} stock entries to Market {}",
            skus.len(),
            self.scheme.as_str()
        );

        let response = self
            .http
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&StocksRequest { skus })
            .send()
            .await?;

        http::ensure_accepted(response).await
    }

    /// Pushes one batch of prices via `offer-prices/updates`.
    pub async fn update_prices(&self, offers: &[OfferPrice]) -> Result<()> {
        let url = format!(
            "{}/campaigns/{}/offer-prices/updates",
            self.base_url, self.campaign_id
        );
        log::debug!(
            "Pushing {} price entries to Market {}",
            offers.len(),
            self.scheme.as_str()
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&PricesRequest { offers })
            .send()
            .await?;

        http::ensure_accepted(response).await
    }
}

/// Stock state of one offer in one warehouse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuStock {
    pub sku: String,
    pub warehouse_id: i64,
    pub items: Vec<StockItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub item_type: String,
    pub updated_at: String,
}

/// New price for one offer, in the shape `offer-prices/updates` expects.
#[derive(Debug, Clone, Serialize)]
pub struct OfferPrice {
    pub id: String,
    pub price: PriceValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceValue {
    pub value: u64,
    pub currency_id: String,
}

impl OfferPrice {
    pub fn new(shop_sku: &str, price: u64) -> Self {
        Self {
            id: shop_sku.to_string(),
            price: PriceValue {
                value: price,
                currency_id: "RUR".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    skus: &'a [SkuStock],
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    offers: &'a [OfferPrice],
}

#[derive(Debug, Deserialize)]
struct OfferMappingsResponse {
    result: OfferMappingsResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferMappingsResult {
    offer_mapping_entries: Vec<OfferMappingEntry>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct OfferMappingEntry {
    offer: OfferRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferRef {
    shop_sku: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    #[serde(default)]
    next_page_token: Option<String>,
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
