//! Yandex Market partner API client (FBS and DBS campaigns)

mod client;

pub use client::{MarketClient, OfferPrice, SkuStock, PRICES_CHUNK, STOCKS_CHUNK};

use clap::ValueEnum;

/// Delivery scheme a sync run targets. Each scheme is a separate Market
/// campaign with its own warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryScheme {
    /// Storefront with marketplace-operated delivery
    Fbs,
    /// Seller-operated delivery
    Dbs,
}

impl DeliveryScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryScheme::Fbs => "FBS",
            DeliveryScheme::Dbs => "DBS",
        }
    }
}
