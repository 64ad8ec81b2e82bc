//! Environment-backed configuration for marketplace credentials.
//!
//! Each run reads its credentials once, up front, into a typed config that is
//! passed down to the API clients. A variable missing from the environment is
//! a reportable error, not a panic.

use std::env;

use crate::error::{Result, SyncError};

/// OZON Seller API credentials.
#[derive(Debug, Clone)]
pub struct OzonConfig {
    pub client_id: String,
    pub api_key: String,
}

impl OzonConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require("OZON_CLIENT_ID")?,
            api_key: require("OZON_API_KEY")?,
        })
    }
}

/// One Yandex Market campaign (store) and the warehouse its stock lives in.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub campaign_id: String,
    pub warehouse_id: i64,
}

/// Yandex Market credentials covering both delivery schemes.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub token: String,
    pub fbs: CampaignConfig,
    pub dbs: CampaignConfig,
}

impl MarketConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require("MARKET_TOKEN")?,
            fbs: CampaignConfig {
                campaign_id: require("MARKET_FBS_CAMPAIGN_ID")?,
                warehouse_id: require_i64("MARKET_FBS_WAREHOUSE_ID")?,
            },
            dbs: CampaignConfig {
                campaign_id: require("MARKET_DBS_CAMPAIGN_ID")?,
                warehouse_id: require_i64("MARKET_DBS_WAREHOUSE_ID")?,
            },
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SyncError::Config(format!("{name} is not set"))),
    }
}

fn require_i64(name: &str) -> Result<i64> {
    let raw = require(name)?;
    raw.trim()
        .parse()
        .map_err(|_| SyncError::Config(format!("{name} must be an integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_missing_variable_is_config_error() {
        env::remove_var("STOCK_SYNC_TEST_MISSING");
        let err = require("STOCK_SYNC_TEST_MISSING").unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
        assert!(err.to_string().contains("STOCK_SYNC_TEST_MISSING"));
    }

    #[test]
    fn require_rejects_blank_value() {
        env::set_var("STOCK_SYNC_TEST_BLANK", "   ");
        assert!(require("STOCK_SYNC_TEST_BLANK").is_err());
    }

    #[test]
    fn require_i64_parses_and_rejects() {
        env::set_var("STOCK_SYNC_TEST_WAREHOUSE", "778899");
        assert_eq!(require_i64("STOCK_SYNC_TEST_WAREHOUSE").unwrap(), 778899);

        env::set_var("STOCK_SYNC_TEST_WAREHOUSE_BAD", "main-warehouse");
        let err = require_i64("STOCK_SYNC_TEST_WAREHOUSE_BAD").unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }
}
