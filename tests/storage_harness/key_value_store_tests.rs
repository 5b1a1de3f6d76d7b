//! Macro-generated test suite for `KeyValueStore` contract validation.
//!
//! The `key_value_store_tests!` macro generates a test module that validates
//! any `KeyValueStore` implementation: basic get/set/remove, overwrite,
//! isolation between keys, awkward keys and values, concurrent writers, and
//! preference round trips through `KeyValuePreferenceStore`.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//!
//! key_value_store_tests!(in_memory_store());
//! ```
//!
//! # Generated Tests
//!
//! - `test_get_missing` — unknown key reads `None`
//! - `test_set_then_get` — value is returned unchanged
//! - `test_overwrite` — second write wins
//! - `test_remove` — removed key reads `None`, removing twice succeeds
//! - `test_keys_are_isolated` — writes to one key leave others untouched
//! - `test_unusual_keys_and_values` — unicode, separators, empty value
//! - `test_concurrent_writers` — parallel writes from spawned tasks
//! - `test_preferences_round_trip` — save then load through the store
//! - `test_legacy_document_is_migrated` — old settings load as schema 2

/// Generate a full `KeyValueStore` conformance test suite.
///
/// `$factory` must evaluate to a `(store, guard)` tuple. The store must
/// implement `KeyValueStore + Clone + 'static`; the guard keeps any backing
/// resources (such as a temporary directory) alive for the test. The factory
/// is re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! key_value_store_tests {
    ($factory:expr) => {
        mod key_value_store_contract_tests {
            use super::*;
            use estate::config::ListingConfig;
            use estate::core::filter::FilterKind;
            use estate::core::service::KeyValueStore;
            use estate::core::sort::{SortKey, SortRule};
            use estate::preferences::{
                KeyValuePreferenceStore, PreferenceStore, Preferences, legacy_order_key,
                settings_key,
            };

            // ==================================================================
            // Basic operations
            // ==================================================================

            #[tokio::test]
            async fn test_get_missing() {
                let (store, _guard) = $factory;
                assert_eq!(store.get("nope").await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_set_then_get() {
                let (store, _guard) = $factory;
                store.set("property_settings_u1", "{\"a\":1}").await.unwrap();
                assert_eq!(
                    store.get("property_settings_u1").await.unwrap().as_deref(),
                    Some("{\"a\":1}")
                );
            }

            #[tokio::test]
            async fn test_overwrite() {
                let (store, _guard) = $factory;
                store.set("k", "first").await.unwrap();
                store.set("k", "second").await.unwrap();
                assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
            }

            #[tokio::test]
            async fn test_remove() {
                let (store, _guard) = $factory;
                store.set("k", "v").await.unwrap();
                store.remove("k").await.unwrap();
                assert_eq!(store.get("k").await.unwrap(), None);

                // Removing a missing key is not an error
                store.remove("k").await.unwrap();
            }

            #[tokio::test]
            async fn test_keys_are_isolated() {
                let (store, _guard) = $factory;
                store.set("property_settings_u1", "one").await.unwrap();
                store.set("property_settings_u2", "two").await.unwrap();
                store.remove("property_settings_u1").await.unwrap();

                assert_eq!(store.get("property_settings_u1").await.unwrap(), None);
                assert_eq!(
                    store.get("property_settings_u2").await.unwrap().as_deref(),
                    Some("two")
                );
            }

            #[tokio::test]
            async fn test_unusual_keys_and_values() {
                let (store, _guard) = $factory;
                let keys = ["사용자/설정", "a.b", "with space", "../escape"];
                for (i, key) in keys.iter().enumerate() {
                    store.set(key, &format!("value-{}", i)).await.unwrap();
                }
                for (i, key) in keys.iter().enumerate() {
                    assert_eq!(
                        store.get(key).await.unwrap(),
                        Some(format!("value-{}", i)),
                        "key {:?}",
                        key
                    );
                }

                store.set("empty", "").await.unwrap();
                assert_eq!(store.get("empty").await.unwrap().as_deref(), Some(""));
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_writers() {
                let (store, _guard) = $factory;

                let mut handles = Vec::new();
                for i in 0..8 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .set(&format!("user_{}", i), &i.to_string())
                            .await
                            .unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                for i in 0..8 {
                    assert_eq!(
                        store.get(&format!("user_{}", i)).await.unwrap(),
                        Some(i.to_string())
                    );
                }
            }

            // ==================================================================
            // Preferences over this store
            // ==================================================================

            #[tokio::test]
            async fn test_preferences_round_trip() {
                let (store, _guard) = $factory;
                let config = ListingConfig::default_config();
                let prefs_store = KeyValuePreferenceStore::new(store.clone(), &config);

                let mut prefs = Preferences::initial(&config);
                prefs.sort_rules = vec![
                    SortRule::desc(SortKey::CreatedAt),
                    SortRule::asc(SortKey::Name),
                ];
                prefs.active_filters = vec![FilterKind::Manager, FilterKind::Total];
                prefs.manager_filters = vec!["u7".to_string()];
                prefs.price_filter.total_max = "100000".to_string();

                prefs_store.save("u1", &prefs).await.unwrap();
                assert_eq!(prefs_store.load("u1").await.unwrap(), prefs);

                assert!(store.get(&settings_key("u1")).await.unwrap().is_some());
                assert!(store.get(&legacy_order_key("u1")).await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_legacy_document_is_migrated() {
                let (store, _guard) = $factory;
                store
                    .set(&settings_key("u1"), &legacy_settings_json())
                    .await
                    .unwrap();

                let config = ListingConfig::default_config();
                let prefs_store = KeyValuePreferenceStore::new(store.clone(), &config);
                let prefs = prefs_store.load("u1").await.unwrap();

                assert_eq!(prefs.sort_rules, vec![SortRule::desc(SortKey::MonthlyProfit)]);
                assert_eq!(
                    prefs.active_filters,
                    vec![FilterKind::Status, FilterKind::MonthlyProfit]
                );
                assert_eq!(prefs.visible_columns, vec!["name", "monthlyProfit", "deposit"]);
                assert_eq!(&prefs.column_order[..2], &["name", "monthlyProfit"]);
                assert_eq!(prefs.column_order.len(), config.columns.widths.len());
                assert_eq!(prefs.price_filter.profit_min, "300");
                assert_eq!(prefs.area_filter.min, "10");
                assert!(prefs.show_favorites_only);

                // Loading never rewrites the stored document
                assert_eq!(
                    store.get(&settings_key("u1")).await.unwrap(),
                    Some(legacy_settings_json())
                );
            }
        }
    };
}
