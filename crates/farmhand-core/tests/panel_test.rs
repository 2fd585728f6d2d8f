#![allow(clippy::unwrap_used)]
// Integration tests for the panel controller against a mock backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use farmhand_core::store::LoadState;
use farmhand_core::{AnimalType, Diet, Livestock, Panel, PanelConfig, TagId};

// ── Helpers ─────────────────────────────────────────────────────────

fn panel_for(server: &MockServer) -> Panel {
    let config = PanelConfig {
        server: server.uri().parse().unwrap(),
        timeout: Duration::from_secs(5),
        sync_delay: Duration::from_millis(25),
    };
    Panel::new(config).unwrap()
}

fn wire_animal(tag_id: u32, animal_type: &str, harvestable: bool) -> serde_json::Value {
    json!({
        "tagID": tag_id,
        "animalType": animal_type,
        "age": 2,
        "diet": "wheat",
        "weight": 100.0,
        "lastFed": "2024-06-01",
        "harvestable": harvestable,
        "lastViolatedForHarvestedGoods": null
    })
}

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Long enough for a 25ms deferred sync to have fired.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

// ── Sync ────────────────────────────────────────────────────────────

#[tokio::test]
async fn initial_sync_loads_unfiltered_snapshot() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([wire_animal(4001, "cow", false), wire_animal(4002, "pig", true)]),
    )
    .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    assert_eq!(panel.store().load_state(), LoadState::Loaded);
    assert_eq!(panel.store().len(), 2);
    assert!(panel.store().find(TagId::new(4002).unwrap()).is_some());

    panel.shutdown().await;
}

#[tokio::test]
async fn enabled_filter_issues_filtered_fetch() {
    let server = MockServer::start().await;
    mount_list(&server, json!([wire_animal(4001, "cow", false)])).await;

    Mock::given(method("POST"))
        .and(path("/api/livestock/filter"))
        .and(body_partial_json(json!({"animalType": "sheep"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4100, "sheep", true)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    panel
        .edit_filter(|filter| {
            filter.enabled = true;
            filter.criteria_mut().animal_type = Some(AnimalType::Sheep);
        })
        .await;
    panel.sync(false).await.unwrap();

    let snapshot = panel.store().snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].tag.get(), 4100);

    panel.shutdown().await;
}

#[tokio::test]
async fn failed_sync_keeps_previous_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4001, "cow", false)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();
    assert_eq!(panel.store().len(), 1);

    let result = panel.sync(false).await;
    assert!(result.is_err(), "second sync should fail");

    // Previous snapshot and Loaded state survive the failure; the panel
    // is immediately ready to retry.
    assert_eq!(panel.store().load_state(), LoadState::Loaded);
    assert_eq!(panel.store().len(), 1);

    panel.shutdown().await;
}

#[tokio::test]
async fn clear_filters_refetches_unfiltered_immediately() {
    let server = MockServer::start().await;
    mount_list(&server, json!([wire_animal(4001, "cow", false)])).await;

    // The filter endpoint must never be hit after clearing.
    Mock::given(method("POST"))
        .and(path("/api/livestock/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    panel
        .edit_filter(|filter| {
            filter.enabled = true;
            filter.criteria_mut().harvestable = Some(true);
        })
        .await;

    panel.clear_filters().await.unwrap();

    let filter = panel.filter().await;
    assert!(!filter.enabled);
    assert!(filter.criteria().is_empty());

    panel.shutdown().await;
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn harvest_guard_never_reaches_backend() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([wire_animal(4001, "cow", false), wire_animal(4002, "cow", true)]),
    )
    .await;

    // Exactly one update request: the harvest of #4002.
    Mock::given(method("POST"))
        .and(path("/api/livestock/update"))
        .and(body_partial_json(json!({
            "record": {"tagID": 4002},
            "action": "harvest"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    let blocked = panel.harvest(TagId::new(4001).unwrap()).await;
    assert!(
        matches!(
            blocked,
            Err(farmhand_core::CoreError::NotHarvestable { tag: 4001 })
        ),
        "expected NotHarvestable, got: {blocked:?}"
    );

    panel.harvest(TagId::new(4002).unwrap()).await.unwrap();
    settle().await;

    panel.shutdown().await;
    server.verify().await;
}

#[tokio::test]
async fn feed_schedules_deferred_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4001, "cow", false)])),
        )
        .expect(2) // initial sync + deferred re-sync after the feed
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/livestock/update"))
        .and(body_partial_json(json!({"action": "feed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    panel.feed(TagId::new(4001).unwrap()).await.unwrap();
    settle().await;

    panel.shutdown().await;
    server.verify().await;
}

#[tokio::test]
async fn failed_mutation_schedules_no_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4001, "cow", false)])),
        )
        .expect(1) // only the initial sync — the rejected feed must not re-fetch
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/livestock/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    let result = panel.feed(TagId::new(4001).unwrap()).await;
    assert!(
        matches!(result, Err(farmhand_core::CoreError::Rejected { .. })),
        "expected Rejected, got: {result:?}"
    );
    settle().await;

    panel.shutdown().await;
    server.verify().await;
}

#[tokio::test]
async fn terminate_issues_exactly_one_delete() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4003, "sheep", false)])),
        )
        .expect(2) // initial sync + deferred re-sync after the delete
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/livestock/delete"))
        .and(body_partial_json(json!({"tagID": 4003})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    panel.terminate(TagId::new(4003).unwrap()).await.unwrap();
    settle().await;

    panel.shutdown().await;
    server.verify().await;
}

#[tokio::test]
async fn added_record_appears_exactly_once_after_resync() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([wire_animal(4001, "cow", false)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/livestock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wire_animal(4001, "cow", false),
            wire_animal(4500, "pig", false)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/livestock/insert"))
        .and(body_partial_json(json!({"tagID": 4500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();
    assert_eq!(panel.store().len(), 1);

    let new_animal = Livestock {
        tag: TagId::new(4500).unwrap(),
        animal_type: AnimalType::Pig,
        age: 1,
        diet: Diet::Corn,
        weight: 30.0,
        last_fed: None,
        harvestable: false,
        last_harvested: None,
        food_spent: None,
        water_spent: None,
    };
    panel.insert(new_animal).await.unwrap();
    settle().await;

    let snapshot = panel.store().snapshot().unwrap();
    let occurrences = snapshot.iter().filter(|l| l.tag.get() == 4500).count();
    assert_eq!(occurrences, 1, "tag 4500 must appear exactly once");

    panel.shutdown().await;
}

// ── Reports & counts ────────────────────────────────────────────────

#[tokio::test]
async fn counts_tolerate_one_failing_category() {
    let server = MockServer::start().await;
    mount_list(&server, json!([])).await;

    for (animal, count) in [("cow", 3_u64), ("chicken", 12), ("pig", 5)] {
        Mock::given(method("GET"))
            .and(path("/api/livestock/count"))
            .and(query_param("animalType", animal))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"animalType": animal, "count": count}])),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/livestock/count"))
        .and(query_param("animalType", "sheep"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    let counts = panel.refresh_counts().await;
    assert_eq!(counts.get(&AnimalType::Cow), Some(&3));
    assert_eq!(counts.get(&AnimalType::Chicken), Some(&12));
    assert_eq!(counts.get(&AnimalType::Pig), Some(&5));
    assert!(!counts.contains_key(&AnimalType::Sheep));

    // The merged table is applied to the store in one update.
    assert_eq!(panel.store().counts().len(), 3);

    panel.shutdown().await;
}

#[tokio::test]
async fn resource_report_distinguishes_no_data() {
    let server = MockServer::start().await;
    mount_list(&server, json!([wire_animal(4001, "cow", false)])).await;

    Mock::given(method("GET"))
        .and(path("/api/livestock/4001/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "totalFoodConsumed": 42,
            "totalWaterConsumed": 99
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/livestock/4002/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let panel = panel_for(&server);
    panel.start().await.unwrap();

    let fed = panel
        .resource_report(TagId::new(4001).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fed.food, 42);
    assert_eq!(fed.water, 99);

    let neglected = panel
        .resource_report(TagId::new(4002).unwrap())
        .await
        .unwrap();
    assert!(neglected.is_none(), "empty report must be a distinct case");

    panel.shutdown().await;
}
