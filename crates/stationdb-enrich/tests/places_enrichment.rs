//! End-to-end enrichment against a mocked Places API.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use stationdb_core::{MatchMethod, SourceRecord, UnitCosts};
use stationdb_enrich::{BatchSummary, DetailsClient, EnrichSettings, Enricher, SearchClient};
use stationdb_places::PlacesClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn enricher_for(server: &MockServer) -> Enricher {
    let client = Arc::new(
        PlacesClient::with_base_url("test-key", 5, 0, 0, &server.uri())
            .expect("client construction should not fail"),
    );
    Enricher::new(
        Arc::clone(&client) as Arc<dyn SearchClient>,
        client as Arc<dyn DetailsClient>,
        EnrichSettings::default(),
    )
}

fn station(name: &str, address: &str) -> SourceRecord {
    SourceRecord {
        name: name.to_owned(),
        address: address.to_owned(),
        phone: "610-555-0100".to_owned(),
        county: "Delaware".to_owned(),
    }
}

#[tokio::test]
async fn batch_enriches_matches_and_records_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .and(body_partial_json(json!({
            "textQuery": "Sunoco, 123 Main Street, Springfield PA 19064, Pennsylvania"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": [{
                "id": "ChIJsunoco",
                "displayName": { "text": "Sunoco" },
                "formattedAddress": "123 Main St, Springfield, PA 19064, USA"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .and(body_partial_json(json!({
            "textQuery": "Ghost Fuel, 1 Nowhere Rd, Erie PA 16501, Pennsylvania"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .and(body_partial_json(json!({
            "textQuery": "Broken Pump, 5 Oak Ave, Media PA 19063, Pennsylvania"
        })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "Internal error.", "status": "INTERNAL" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/places/ChIJsunoco"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ChIJsunoco",
            "displayName": { "text": "Sunoco" },
            "formattedAddress": "123 Main St, Springfield, PA 19064, USA",
            "internationalPhoneNumber": "+1 610-555-0100",
            "rating": 4.1,
            "currentOpeningHours": { "openNow": true, "weekdayDescriptions": ["Monday: Open 24 hours"] },
            "accessibilityOptions": { "wheelchairAccessibleEntrance": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = enricher_for(&server);
    let records = vec![
        station("Sunoco", "123 Main Street, Springfield PA 19064"),
        station("Ghost Fuel", "1 Nowhere Rd, Erie PA 16501"),
        station("Broken Pump", "5 Oak Ave, Media PA 19063"),
    ];
    let results = enricher.enrich_batch(&records).await;

    assert_eq!(results.len(), 3);

    let sunoco = &results[0];
    assert!(sunoco.matched);
    assert_eq!(sunoco.match_method, MatchMethod::AddressExact);
    assert_eq!(sunoco.place_id.as_deref(), Some("ChIJsunoco"));
    assert_eq!(sunoco.place_phone.as_deref(), Some("+1 610-555-0100"));
    assert_eq!(sunoco.wheelchair_accessible, Some(false));
    assert!(sunoco.website.is_none());
    assert_eq!(sunoco.api_calls, 2);

    let ghost = &results[1];
    assert!(!ghost.matched);
    assert_eq!(ghost.error.as_deref(), Some("No results found in text search"));

    let broken = &results[2];
    let error = broken.error.as_deref().expect("error recorded");
    assert!(error.starts_with("Text search failed: "), "error: {error}");
    assert!(error.contains("Internal error."), "error: {error}");
    assert_eq!(broken.api_calls, 1);

    let costs = UnitCosts::default();
    let expected = costs.max_per_record() + costs.text_search * Decimal::from(2);
    assert_eq!(enricher.totals().total_cost, expected);

    let summary = BatchSummary::from_results(&results, 12_627);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.total_cost, expected);
    assert_eq!(summary.completeness.opening_hours.present, 1);

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(
        json[0]["opening_hours"]["weekdayDescriptions"][0],
        "Monday: Open 24 hours"
    );
    assert_eq!(json[1]["place_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn details_timeout_is_a_recoverable_record_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": [{
                "id": "places/ChIJslow",
                "displayName": { "text": "Gulf" },
                "formattedAddress": "1 State St, Erie, PA 16501, USA"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/places/ChIJslow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "ChIJslow" }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(
        PlacesClient::with_base_url("test-key", 1, 0, 0, &server.uri())
            .expect("client construction should not fail"),
    );
    let enricher = Enricher::new(
        Arc::clone(&client) as Arc<dyn SearchClient>,
        client as Arc<dyn DetailsClient>,
        EnrichSettings::default(),
    );

    let result = enricher
        .enrich_one(&station("Gulf", "1 State Street, Erie PA 16501"))
        .await;

    assert!(result.matched);
    assert!(result.place_id.is_none());
    let error = result.error.expect("error recorded");
    assert!(error.starts_with("Place details failed: "), "error: {error}");
    assert_eq!(result.api_calls, 2);
    assert_eq!(result.total_cost, UnitCosts::default().max_per_record());
}

#[tokio::test]
async fn retried_search_attempts_are_each_charged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "Unavailable.", "status": "UNAVAILABLE" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": [{
                "id": "ChIJgulf",
                "displayName": { "text": "Gulf" },
                "formattedAddress": "1 State St, Erie, PA 16501, USA"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/places/ChIJgulf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ChIJgulf" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(
        PlacesClient::with_base_url("test-key", 5, 2, 0, &server.uri())
            .expect("client construction should not fail"),
    );
    let enricher = Enricher::new(
        Arc::clone(&client) as Arc<dyn SearchClient>,
        client as Arc<dyn DetailsClient>,
        EnrichSettings::default(),
    );

    let result = enricher
        .enrich_one(&station("Gulf", "1 State Street, Erie PA 16501"))
        .await;

    let costs = UnitCosts::default();
    assert!(result.matched);
    assert!(result.error.is_none());
    assert_eq!(result.api_calls, 3);
    assert_eq!(
        result.total_cost,
        costs.text_search * Decimal::from(2) + costs.details()
    );
    assert_eq!(enricher.totals().api_calls, 3);
}
