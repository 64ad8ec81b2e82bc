//! Timeworld supplier feed client for fetching stock and price snapshots

mod feed;

pub use feed::{StockFeed, SupplierRecord};
