//! Timeworld stock feed fetching and parsing

use std::collections::HashMap;
use std::io::{Cursor, Read};

use crate::error::{Result, SyncError};

/// Timeworld stock feed archive URL
const FEED_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";

/// Header cells that mark the data table inside the stock sheet.
const CODE_HEADER: &str = "Код";
const QUANTITY_HEADER: &str = "Количество";
const PRICE_HEADER: &str = "Цена";

/// One product row from the supplier feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRecord {
    /// Product code, matched against marketplace SKUs
    pub code: String,
    /// Sellable units after feed normalization
    pub units: u32,
    /// Price in rubles, decimal
    pub unit_price: f64,
}

/// Supplier stock snapshot indexed by product code.
#[derive(Debug)]
pub struct StockFeed {
    records: HashMap<String, SupplierRecord>,
}

impl StockFeed {
    /// Fetch the current stock snapshot from Timeworld.
    pub async fn fetch(client: &reqwest::Client) -> Result<Self> {
        Self::fetch_from(client, FEED_URL).await
    }

    /// Fetches the feed archive from the given URL (for testing with mock servers).
    pub(crate) async fn fetch_from(client: &reqwest::Client, url: &str) -> Result<Self> {
        log::info!("Fetching stock feed from {url}...");

        let response = client
            .get(url)
            .header("User-Agent", "stock_sync/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        let archive = response.bytes().await?;
        let feed = Self::parse_archive(&archive)?;
        log::info!("Parsed {} supplier records", feed.len());
        Ok(feed)
    }

    /// Opens the feed archive and parses the stock sheet inside it.
    fn parse_archive(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

        let sheet_name = archive
            .file_names()
            .find(|name| name.ends_with(".csv"))
            .map(str::to_string)
            .ok_or_else(|| SyncError::Feed("archive contains no stock sheet".to_string()))?;

        let mut sheet = String::new();
        archive.by_name(&sheet_name)?.read_to_string(&mut sheet)?;

        Self::parse_sheet(&sheet)
    }

    /// Parses the `;`-delimited stock sheet. Rows before the `Код` header row
    /// are a vendor banner and carry no data.
    fn parse_sheet(sheet: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(sheet.as_bytes());

        let mut columns: Option<(usize, usize, usize)> = None;
        let mut records = HashMap::new();

        for row in reader.records() {
            let row = row?;
            let Some((code_col, quantity_col, price_col)) = columns else {
                columns = header_columns(&row);
                continue;
            };

            let code = row.get(code_col).unwrap_or("").trim();
            if code.is_empty() {
                continue;
            }
            let quantity = row.get(quantity_col).unwrap_or("");
            let price = row.get(price_col).unwrap_or("");

            match parse_row(code, quantity, price) {
                Some(record) => {
                    records.insert(record.code.clone(), record);
                }
                None => {
                    log::warn!(
                        "Skipping feed row '{code}': quantity '{quantity}' / price '{price}' not parseable"
                    );
                }
            }
        }

        if columns.is_none() {
            return Err(SyncError::Feed(format!(
                "stock sheet has no '{CODE_HEADER}' header row"
            )));
        }

        Ok(Self { records })
    }

    /// Look up a record by product code.
    pub fn get(&self, code: &str) -> Option<&SupplierRecord> {
        self.records.get(code)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all supplier records
    pub fn iter(&self) -> impl Iterator<Item = &SupplierRecord> {
        self.records.values()
    }

    /// Create a StockFeed from records (for testing)
    #[cfg(test)]
    pub(crate) fn from_records(records: Vec<SupplierRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.code.clone(), r)).collect();
        Self { records }
    }
}

/// Returns the (code, quantity, price) column positions if this row is the
/// table header.
fn header_columns(row: &csv::StringRecord) -> Option<(usize, usize, usize)> {
    let find = |header: &str| row.iter().position(|cell| cell.trim() == header);
    Some((
        find(CODE_HEADER)?,
        find(QUANTITY_HEADER)?,
        find(PRICE_HEADER)?,
    ))
}

/// Parses one data row; `None` if quantity or price cannot be read.
fn parse_row(code: &str, quantity: &str, price: &str) -> Option<SupplierRecord> {
    Some(SupplierRecord {
        code: code.to_string(),
        units: parse_quantity(quantity)?,
        unit_price: parse_price(price)?,
    })
}

/// Normalizes a feed quantity cell.
///
/// The feed reports `>10` when more than ten units are on hand, and `1` when
/// only a display sample is left, which is not sellable stock.
fn parse_quantity(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if cell == ">10" {
        return Some(100);
    }
    if cell == "1" {
        return Some(0);
    }
    cell.parse().ok()
}

/// Parses a price cell such as `5'990.00 руб.` into decimal rubles.
fn parse_price(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    // The currency suffix "руб." leaves a trailing dot behind the filter.
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
