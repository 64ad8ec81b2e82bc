//! End-to-end pipeline tests against mock marketplace and feed servers.

use std::io::{Cursor, Write};

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{push_to_market, push_to_ozon};
use crate::config::{CampaignConfig, MarketConfig, OzonConfig};
use crate::ozon::OzonClient;
use crate::timeworld::StockFeed;
use crate::yandex::{DeliveryScheme, MarketClient};

/// One listed product (A1) in stock, one (A2) unknown to the supplier.
const SHEET: &str = "\
Остатки на складе;;;
Код;Наименование;Количество;Цена
A1;Часы A1;5;199.50 руб.
";

fn feed_archive(sheet: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("ostatki.csv", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(sheet.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn ozon_client(uri: &str) -> OzonClient {
    let config = OzonConfig {
        client_id: "client-1".to_string(),
        api_key: "key-1".to_string(),
    };
    let mut client = OzonClient::new(reqwest::Client::new(), &config);
    client.base_url = uri.to_string();
    client
}

fn market_client(uri: &str, scheme: DeliveryScheme) -> MarketClient {
    let config = MarketConfig {
        token: "token-1".to_string(),
        fbs: CampaignConfig {
            campaign_id: "111".to_string(),
            warehouse_id: 710,
        },
        dbs: CampaignConfig {
            campaign_id: "222".to_string(),
            warehouse_id: 720,
        },
    };
    let mut client = MarketClient::new(reqwest::Client::new(), &config, scheme);
    client.base_url = uri.to_string();
    client
}

async fn mount_feed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/feed/ostatki.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(feed_archive(SHEET)))
        .mount(server)
        .await;
}

// ── OZON pipeline ────────────────────────────────────────────────────

#[tokio::test]
async fn matched_offer_is_pushed_once_and_unmatched_is_skipped() {
    let server = MockServer::start().await;
    mount_feed(&server).await;

    Mock::given(method("POST"))
        .and(path("/v3/product/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [
                    {"product_id": 1, "offer_id": "A1"},
                    {"product_id": 2, "offer_id": "A2"}
                ],
                "total": 2,
                "last_id": ""
            }
        })))
        .mount(&server)
        .await;

    // Exactly one stock batch: A1 with the supplier's unit count.
    Mock::given(method("POST"))
        .and(path("/v1/product/import/stocks"))
        .and(body_string_contains("\"offer_id\":\"A1\""))
        .and(body_string_contains("\"stock\":5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    // Exactly one price batch: 199.50 truncated to whole rubles.
    Mock::given(method("POST"))
        .and(path("/v1/product/import/prices"))
        .and(body_string_contains("\"offer_id\":\"A1\""))
        .and(body_string_contains("\"price\":\"199\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ozon_client(&server.uri());
    let offer_ids = client.fetch_offer_ids().await.unwrap();
    let http = reqwest::Client::new();
    let feed = StockFeed::fetch_from(&http, &format!("{}/feed/ostatki.zip", server.uri()))
        .await
        .unwrap();

    let report = push_to_ozon(&client, &feed, &offer_ids).await;
    assert_eq!(report.planned, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.stock_batches, 1);
    assert_eq!(report.price_batches, 1);
    assert!(report.is_clean());

    // A2 never appeared in any update payload.
    for request in server.received_requests().await.unwrap() {
        if request.url.path().starts_with("/v1/product/import") {
            let body = String::from_utf8_lossy(&request.body).to_string();
            assert!(!body.contains("A2"), "unmatched SKU was pushed: {body}");
        }
    }
}

#[tokio::test]
async fn feed_failure_aborts_before_any_update() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed/ostatki.zip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // No update endpoint may be hit when the feed fetch fails.
    Mock::given(method("POST"))
        .and(path("/v1/product/import/stocks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/product/import/prices"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let err = StockFeed::fetch_from(&http, &format!("{}/feed/ostatki.zip", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "FetchError");
}

#[tokio::test]
async fn unreachable_feed_reports_a_connection_error() {
    let http = reqwest::Client::new();
    let err = StockFeed::fetch_from(&http, "http://127.0.0.1:9/ostatki.zip")
        .await
        .unwrap_err();
    let message = err.user_message();
    assert!(message.contains("ConnectionError"), "got: {message}");
}

#[tokio::test]
async fn rejected_stock_batch_does_not_stop_price_push() {
    let server = MockServer::start().await;
    mount_feed(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/product/import/stocks"))
        .respond_with(ResponseTemplate::new(400).set_body_string("stock rejected"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/product/import/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ozon_client(&server.uri());
    let http = reqwest::Client::new();
    let feed = StockFeed::fetch_from(&http, &format!("{}/feed/ostatki.zip", server.uri()))
        .await
        .unwrap();

    let offer_ids = vec!["A1".to_string()];
    let report = push_to_ozon(&client, &feed, &offer_ids).await;
    assert_eq!(report.stock_batches, 0);
    assert_eq!(report.price_batches, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].contains("UpdateError"));
}

// ── Market pipeline ──────────────────────────────────────────────────

#[tokio::test]
async fn dbs_pipeline_pushes_to_the_dbs_campaign_only() {
    let server = MockServer::start().await;
    mount_feed(&server).await;

    Mock::given(method("PUT"))
        .and(path("/campaigns/222/offers/stocks"))
        .and(body_string_contains("\"warehouseId\":720"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/campaigns/222/offer-prices/updates"))
        .and(body_string_contains("\"value\":199"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    // The FBS campaign stays untouched.
    Mock::given(method("PUT"))
        .and(path("/campaigns/111/offers/stocks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = market_client(&server.uri(), DeliveryScheme::Dbs);
    let http = reqwest::Client::new();
    let feed = StockFeed::fetch_from(&http, &format!("{}/feed/ostatki.zip", server.uri()))
        .await
        .unwrap();

    let offer_ids = vec!["A1".to_string(), "A2".to_string()];
    let report = push_to_market(&client, &feed, &offer_ids).await;
    assert_eq!(report.planned, 1);
    assert_eq!(report.unmatched, 1);
    assert!(report.is_clean());
}
