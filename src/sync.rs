//! Sync pipeline: match supplier stock against a marketplace catalog and
//! push the updated counts and prices.
//!
//! Each run is fetch → match → push. A catalog or feed fetch failure aborts
//! the run before any update is sent; a rejected push batch is reported and
//! the remaining batches are still sent.

use std::collections::HashSet;
use std::fmt;

use crate::config::{MarketConfig, OzonConfig};
use crate::error::{Result, SyncError};
use crate::ozon::{self, OzonClient, PriceUpdate, StockUpdate};
use crate::price::to_integer_price;
use crate::timeworld::StockFeed;
use crate::yandex::{self, DeliveryScheme, MarketClient, OfferPrice, SkuStock};

/// One planned marketplace update: the new stock count and whole-number
/// price for an offer that matched a supplier record.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub offer_id: String,
    pub stock: u32,
    pub price: u64,
}

/// Outcome of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Offers matched against the supplier feed and queued for update
    pub planned: usize,
    /// Marketplace SKUs with no supplier record, left untouched
    pub unmatched: usize,
    /// Stock batches accepted by the marketplace
    pub stock_batches: usize,
    /// Price batches accepted by the marketplace
    pub price_batches: usize,
    /// User-facing messages for batches the marketplace rejected
    pub failures: Vec<String>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} offers planned, {} skipped, {} stock / {} price batches pushed, {} failed",
            self.planned,
            self.unmatched,
            self.stock_batches,
            self.price_batches,
            self.failures.len()
        )
    }
}

/// Matches marketplace SKUs against the supplier feed.
///
/// SKUs without a supplier record keep their current marketplace state, and
/// supplier records without a listed SKU are ignored. Each listed SKU yields
/// at most one update; a record whose price the formatter rejects is dropped
/// with a warning.
pub fn plan_updates(feed: &StockFeed, offer_ids: &[String]) -> (Vec<ItemUpdate>, usize) {
    let mut updates = Vec::new();
    let mut unmatched = 0;
    let mut seen: HashSet<&str> = HashSet::new();

    for offer_id in offer_ids {
        if !seen.insert(offer_id) {
            continue;
        }
        let Some(record) = feed.get(offer_id) else {
            unmatched += 1;
            continue;
        };
        match to_integer_price(record.unit_price) {
            Ok(price) => updates.push(ItemUpdate {
                offer_id: offer_id.clone(),
                stock: record.units,
                price,
            }),
            Err(e) => {
                log::warn!("Dropping '{offer_id}' from the plan: {e}");
            }
        }
    }

    (updates, unmatched)
}

/// Runs a full OZON sync: catalog and feed fetch, matching, chunked pushes.
pub async fn run_ozon(http: &reqwest::Client, config: &OzonConfig) -> Result<SyncReport> {
    let client = OzonClient::new(http.clone(), config);
    let offer_ids = client.fetch_offer_ids().await?;
    let feed = StockFeed::fetch(http).await?;
    Ok(push_to_ozon(&client, &feed, &offer_ids).await)
}

/// Pushes the matched plan to OZON in API-sized batches.
pub async fn push_to_ozon(
    client: &OzonClient,
    feed: &StockFeed,
    offer_ids: &[String],
) -> SyncReport {
    let (updates, unmatched) = plan_updates(feed, offer_ids);
    let mut report = SyncReport {
        planned: updates.len(),
        unmatched,
        ..Default::default()
    };

    let stocks: Vec<StockUpdate> = updates
        .iter()
        .map(|u| StockUpdate {
            offer_id: u.offer_id.clone(),
            stock: u.stock,
        })
        .collect();
    for chunk in stocks.chunks(ozon::STOCKS_CHUNK) {
        match client.update_stocks(chunk).await {
            Ok(()) => report.stock_batches += 1,
            Err(e) => record_push_failure(&mut report, e),
        }
    }

    let prices: Vec<PriceUpdate> = updates
        .iter()
        .map(|u| PriceUpdate::new(&u.offer_id, u.price))
        .collect();
    for chunk in prices.chunks(ozon::PRICES_CHUNK) {
        match client.update_prices(chunk).await {
            Ok(()) => report.price_batches += 1,
            Err(e) => record_push_failure(&mut report, e),
        }
    }

    report
}

/// Runs a full Yandex Market sync for one delivery scheme.
pub async fn run_market(
    http: &reqwest::Client,
    config: &MarketConfig,
    scheme: DeliveryScheme,
) -> Result<SyncReport> {
    let client = MarketClient::new(http.clone(), config, scheme);
    let offer_ids = client.fetch_offer_ids().await?;
    let feed = StockFeed::fetch(http).await?;
    Ok(push_to_market(&client, &feed, &offer_ids).await)
}

/// Pushes the matched plan to the campaign in API-sized batches.
pub async fn push_to_market(
    client: &MarketClient,
    feed: &StockFeed,
    offer_ids: &[String],
) -> SyncReport {
    let (updates, unmatched) = plan_updates(feed, offer_ids);
    let mut report = SyncReport {
        planned: updates.len(),
        unmatched,
        ..Default::default()
    };

    let stocks: Vec<SkuStock> = updates
        .iter()
        .map(|u| client.stock_entry(&u.offer_id, u.stock))
        .collect();
    for chunk in stocks.chunks(yandex::STOCKS_CHUNK) {
        match client.update_stocks(chunk).await {
            Ok(()) => report.stock_batches += 1,
            Err(e) => record_push_failure(&mut report, e),
        }
    }

    let prices: Vec<OfferPrice> = updates
        .iter()
        .map(|u| OfferPrice::new(&u.offer_id, u.price))
        .collect();
    for chunk in prices.chunks(yandex::PRICES_CHUNK) {
        match client.update_prices(chunk).await {
            Ok(()) => report.price_batches += 1,
            Err(e) => record_push_failure(&mut report, e),
        }
    }

    report
}

/// Surfaces a rejected batch immediately and keeps it in the run report.
fn record_push_failure(report: &mut SyncReport, err: SyncError) {
    let message = err.user_message();
    log::error!("{message}");
    report.failures.push(message);
}


#[cfg(test)]
#[path = "sync_tests.rs"]
mod pipeline_tests;
