//! Preferences persisted in a directory, across view sessions

use estate::prelude::*;
use estate::preferences::{legacy_order_key, settings_key};
use serde_json::{Value, json};

fn store_in(dir: &tempfile::TempDir) -> FileKeyValueStore {
    FileKeyValueStore::new(dir.path())
}

#[tokio::test]
async fn test_new_user_gets_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ListingConfig::default_config();
    let prefs = KeyValuePreferenceStore::new(store_in(&dir), &config);

    let loaded = prefs.load("nobody").await.unwrap();
    assert_eq!(loaded, Preferences::initial(&config));
    assert_eq!(loaded.sort_rules, vec![SortRule::desc(SortKey::CreatedAt)]);
}

#[tokio::test]
async fn test_standalone_column_order_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .set(
            &legacy_order_key("u1"),
            &json!(["monthlyIncome", "name", "no"]).to_string(),
        )
        .await
        .unwrap();

    let config = ListingConfig::default_config();
    let prefs = KeyValuePreferenceStore::new(store, &config);
    let loaded = prefs.load("u1").await.unwrap();

    assert_eq!(&loaded.column_order[..3], &["monthlyProfit", "name", "no"]);
    assert_eq!(loaded.column_order.len(), config.columns.widths.len());
    assert_eq!(loaded.visible_columns, config.columns.visible);
}

#[tokio::test]
async fn test_corrupt_document_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set(&settings_key("u1"), "{not json").await.unwrap();

    let config = ListingConfig::default_config();
    let prefs = KeyValuePreferenceStore::new(store, &config);
    assert_eq!(prefs.load("u1").await.unwrap(), Preferences::initial(&config));
}

#[tokio::test]
async fn test_view_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = ListingConfig::default_config();
    let prefs = KeyValuePreferenceStore::new(store_in(&dir), &config);

    let mut view = ListingView::new(&config);
    view.add_filter_card(FilterKind::Deposit);
    view.add_filter_card(FilterKind::OperationType);
    view.update_filters(|f| {
        f.deposit = NumericRange::parse("1,000", "5000");
        f.operation_type = vec!["직영".to_string()];
        f.search = "cafe".to_string();
    });
    view.click_header(SortKey::Premium);
    view.toggle_column("yield");
    view.set_page(3);
    prefs.save("u1", &view.to_preferences()).await.unwrap();

    // A later session in a fresh process
    let prefs = KeyValuePreferenceStore::new(store_in(&dir), &config);
    let restored = ListingView::from_preferences(&prefs.load("u1").await.unwrap(), &config);

    assert_eq!(restored.page().current_page, 1);
    assert_eq!(restored.filters().deposit, NumericRange::new(Some(1000.0), Some(5000.0)));
    assert_eq!(restored.filters().operation_type, vec!["직영".to_string()]);
    assert!(restored.filters().search.is_empty());
    assert_eq!(restored.sort().rules(), &[SortRule::asc(SortKey::Premium)]);
    assert_eq!(
        restored.active_filters(),
        &[FilterKind::Deposit, FilterKind::OperationType]
    );
    assert!(restored.visible_columns().contains(&"yield".to_string()));
}

#[tokio::test]
async fn test_saved_document_shape() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let config = ListingConfig::default_config();
    let prefs = KeyValuePreferenceStore::new(store.clone(), &config);

    let mut saved = Preferences::initial(&config);
    saved.schema_version = 1;
    saved.price_filter.profit_min = "300".to_string();
    prefs.save("u1", &saved).await.unwrap();

    let raw = store.get(&settings_key("u1")).await.unwrap().unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["schemaVersion"], json!(2));
    assert_eq!(document["priceFilter"]["profitMin"], json!("300"));
    assert_eq!(document["sortRules"][0], json!({"key": "createdAt", "direction": "desc"}));
    assert_eq!(document["columnWidths"]["name"], json!(200));

    let order = store.get(&legacy_order_key("u1")).await.unwrap().unwrap();
    let order: Vec<String> = serde_json::from_str(&order).unwrap();
    assert_eq!(order, config.columns.order);
}
