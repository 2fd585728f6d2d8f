#![allow(clippy::unwrap_used)]
// Integration tests for `FarmClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use farmhand_api::types::{Bounds, CategorySelector, TriState};
use farmhand_api::{Error, FarmClient, LivestockQuery, LivestockRecord, UpdateAction};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FarmClient) {
    let server = MockServer::start().await;
    let client = FarmClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

fn sample_record(tag_id: u32) -> LivestockRecord {
    LivestockRecord {
        tag_id,
        animal_type: "cow".into(),
        age: 3,
        diet: "wheat".into(),
        weight: 250.0,
        last_fed: None,
        harvestable: true,
        last_harvested: None,
        food_spent: None,
        water_spent: None,
    }
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_livestock_parses_collection() {
    let (server, client) = setup().await;

    let body = json!([{
        "tagID": 4001,
        "animalType": "chicken",
        "age": 1,
        "diet": "corn",
        "weight": 2.4,
        "lastFed": "2024-06-01",
        "harvestable": false,
        "lastViolatedForHarvestedGoods": null
    }]);

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let livestock = client.list_livestock().await.unwrap();

    assert_eq!(livestock.len(), 1);
    assert_eq!(livestock[0].tag_id, 4001);
    assert_eq!(livestock[0].animal_type, "chicken");
    assert!(!livestock[0].harvestable);
    assert!(livestock[0].last_harvested.is_none());
}

#[tokio::test]
async fn list_filtered_sends_criteria_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/filter"))
        .and(body_partial_json(json!({
            "tagID": {"min": 4100, "max": 4200},
            "animalType": "pig",
            "diet": "all",
            "harvestable": true,
            "minFoodSpent": -1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let query = LivestockQuery {
        tag_id: Bounds {
            min: 4100,
            max: 4200,
        },
        animal_type: CategorySelector::Only("pig".into()),
        age: Bounds { min: -1, max: -1 },
        diet: CategorySelector::All,
        harvestable: TriState::Yes,
        min_food_spent: -1,
        min_water_spent: -1,
    };

    let livestock = client.list_filtered(&query).await.unwrap();
    assert!(livestock.is_empty());
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn insert_accepts_true_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/insert"))
        .and(body_partial_json(json!({"tagID": 4500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    client.insert(&sample_record(4500)).await.unwrap();
}

#[tokio::test]
async fn insert_maps_false_to_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/insert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let result = client.insert(&sample_record(4500)).await;
    assert!(
        matches!(result, Err(Error::Rejected { .. })),
        "expected Rejected, got: {result:?}"
    );
}

#[tokio::test]
async fn update_sends_action_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/update"))
        .and(body_partial_json(json!({
            "record": {"tagID": 4002},
            "action": "harvest"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    client
        .update(&sample_record(4002), UpdateAction::Harvest)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_sends_tag_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/delete"))
        .and(body_partial_json(json!({"tagID": 4003})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    client.delete(4003).await.unwrap();
}

// ── Aggregates & reports ────────────────────────────────────────────

#[tokio::test]
async fn count_by_type_uses_query_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock/count"))
        .and(query_param("animalType", "sheep"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"animalType": "sheep", "count": 7}])),
        )
        .mount(&server)
        .await;

    let counts = client.count_by_type("sheep").await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].count, 7);
}

#[tokio::test]
async fn resources_spent_empty_array_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock/4004/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let report = client.resources_spent(4004).await.unwrap();
    assert!(report.is_none());
}

#[tokio::test]
async fn vet_records_returns_first_entry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock/4005/vet-records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "recordID": 17,
            "healthstatus": "healthy",
            "record_date": "2024-03-12"
        }])))
        .mount(&server)
        .await;

    let record = client.vet_records(4005).await.unwrap().unwrap();
    assert_eq!(record.record_id, 17);
    assert_eq!(record.health_status, "healthy");
}

// ── Error taxonomy ──────────────────────────────────────────────────

#[tokio::test]
async fn server_error_becomes_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.list_livestock().await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_becomes_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let result = client.list_livestock().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
