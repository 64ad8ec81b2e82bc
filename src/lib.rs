//! Timeworld → marketplace stock and price synchronization.
//!
//! Pulls the supplier's stock feed, matches it against a marketplace catalog
//! (OZON or Yandex Market) and pushes updated stock counts and whole-number
//! prices back to the marketplace.

pub mod config;
pub mod error;
mod http;
pub mod ozon;
pub mod price;
pub mod sync;
pub mod timeworld;
pub mod yandex;

pub use error::{Result, SyncError};
pub use sync::{plan_updates, ItemUpdate, SyncReport};
pub use timeworld::{StockFeed, SupplierRecord};
