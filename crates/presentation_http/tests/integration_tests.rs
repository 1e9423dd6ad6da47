//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::sync::Arc;

use application::{
    MetarBatch, MetarFeedPort, MetarIngestionService, MetarService, StationCatalog,
    WeatherProductStore, error::ApplicationError,
};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use domain::{Metar, StationCode, StationList, Temperature, WeatherProduct, Wind, metar_key};
use infrastructure::{MokaProductStore, ServerConfig};
use presentation_http::{create_router, state::AppState, with_middleware};
use serde_json::{Value, json};

/// Feed that always returns the same batch
struct StaticFeed(Vec<Metar>);

#[async_trait]
impl MetarFeedPort for StaticFeed {
    async fn fetch_metars(&self) -> Result<MetarBatch, ApplicationError> {
        Ok(MetarBatch {
            records: self.0.clone(),
            rejected: 0,
        })
    }
}

fn code(raw: &str) -> StationCode {
    StationCode::parse(raw).expect("valid station code")
}

fn observation(station: &str, celsius: i64) -> Metar {
    Metar {
        temperature: Some(Temperature { celsius }),
        wind: Some(Wind {
            speed_kt: 5,
            degrees: 180,
        }),
        raw_text: Some(format!("{station} 010000Z 18005KT")),
        ..Metar::new(code(station), "2022-01-01T00:00:00Z")
    }
}

async fn seed(store: &dyn WeatherProductStore, metar: &Metar) {
    let value = serde_json::to_string(metar).expect("serializable");
    store
        .save(WeatherProduct::new(metar_key(&metar.icao), value, Utc::now()))
        .await
        .expect("seeded");
}

/// Build a server over a store seeded with `cached`; the feed serves `feed`
async fn build_server(
    stations: &str,
    cached: &[Metar],
    feed: Vec<Metar>,
) -> (TestServer, Arc<MetarIngestionService>) {
    let store: Arc<dyn WeatherProductStore> = Arc::new(MokaProductStore::new());
    for metar in cached {
        seed(store.as_ref(), metar).await;
    }

    let catalog = StationCatalog::new(
        StationList::from_csv(stations).expect("valid list"),
        "atlanta",
        "Atlanta",
    );
    let ingestion = Arc::new(MetarIngestionService::new(
        Arc::new(StaticFeed(feed)),
        Arc::clone(&store),
    ));
    let state = AppState {
        metar_service: Arc::new(MetarService::new(store, catalog)),
        ingestion: Arc::clone(&ingestion),
    };
    let router = with_middleware(create_router(state), &ServerConfig::default());
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, ingestion)
}

async fn create_test_server(stations: &str, cached: &[Metar]) -> TestServer {
    build_server(stations, cached, vec![]).await.0
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = create_test_server("KATL", &[]).await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ready_is_unavailable_before_any_data() {
    let server = create_test_server("KATL", &[]).await;

    let response = server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["cached_stations"], 0);
    assert_eq!(body["accepted_stations"], 1);
    assert!(body["last_refresh"].is_null());
}

#[tokio::test]
async fn ready_reports_cached_stations() {
    let server = create_test_server("KATL,KPDK", &[observation("KATL", 23)]).await;

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["cached_stations"], 1);
    assert_eq!(body["accepted_stations"], 2);
}

// ============================================================================
// METAR lookup
// ============================================================================

#[tokio::test]
async fn single_station_returns_full_record() {
    let server = create_test_server("KATL", &[observation("KATL", 23)]).await;

    let response = server.get("/metars/katl").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!([{
            "icao": "KATL",
            "observed": "2022-01-01T00:00:00Z",
            "raw_text": "KATL 010000Z 18005KT",
            "temperature": {"celsius": 23},
            "wind": {"speed_kt": 5, "degrees": 180}
        }])
    );
}

#[tokio::test]
async fn group_returns_cached_stations_in_configured_order() {
    let server = create_test_server(
        "KFTY,KPDK,KATL",
        &[observation("KATL", 23), observation("KFTY", 21)],
    )
    .await;

    let response = server.get("/metars/ATLANTA").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let stations: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["icao"].as_str().expect("icao"))
        .collect();
    assert_eq!(stations, vec!["KFTY", "KATL"]);
}

#[tokio::test]
async fn data_params_filter_attributes() {
    let server = create_test_server("KATL", &[observation("KATL", 23)]).await;

    let response = server
        .get("/metars/KATL")
        .add_query_param("data", "temperature")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!([{"icao": "KATL", "temperature": {"celsius": 23}}]));
}

#[tokio::test]
async fn repeated_data_params_select_each_attribute() {
    let server = create_test_server("KATL", &[observation("KATL", 23)]).await;

    let response = server.get("/metars/KATL?data=wind&data=observed").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!([{
            "icao": "KATL",
            "observed": "2022-01-01T00:00:00Z",
            "wind": {"speed_kt": 5, "degrees": 180}
        }])
    );
}

#[tokio::test]
async fn unlisted_station_is_bad_request() {
    let server = create_test_server("KATL", &[observation("KATL", 23)]).await;

    let response = server.get("/metars/KJFK").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_payload");
    let message = body["error"].as_str().expect("message");
    assert!(message.contains("[KJFK]"));
    assert!(message.contains("Atlanta sectional chart"));
}

#[tokio::test]
async fn station_with_surrounding_whitespace_is_bad_request() {
    let server = create_test_server("KATL", &[observation("KATL", 23)]).await;

    let response = server.get("/metars/%20KATL").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_payload");
}

#[tokio::test]
async fn listed_station_without_data_is_not_found() {
    let server = create_test_server("KATL,KPDK", &[observation("KATL", 23)]).await;

    let response = server.get("/metars/KPDK").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn empty_group_is_bad_request() {
    let server = create_test_server("KATL,KPDK", &[]).await;

    let response = server.get("/metars/atlanta").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn refresh_makes_stations_available() {
    let (server, ingestion) = build_server("KATL", &[], vec![observation("KATL", 19)]).await;
    server.get("/metars/KATL").await.assert_status_not_found();

    ingestion.refresh().await;

    let response = server.get("/metars/KATL").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body[0]["temperature"]["celsius"], 19);

    let ready: Value = server.get("/ready").await.json();
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["last_refresh"]["status"], "completed");
    assert_eq!(ready["last_refresh"]["stored"], 1);
}
