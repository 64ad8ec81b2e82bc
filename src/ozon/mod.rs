//! OZON Seller API client for catalog listing and stock/price updates

mod client;

pub use client::{OzonClient, PriceUpdate, StockUpdate, PRICES_CHUNK, STOCKS_CHUNK};
