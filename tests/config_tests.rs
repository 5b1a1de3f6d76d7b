//! Loading listing configuration from YAML files

use estate::config::{DEFAULT_PAGE_DELIMITER, ListingConfig};
use estate::core::error::ConfigError;
use estate::core::sort::{SortKey, SortRule};
use std::io::Write;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
items_per_page: 50
page_sizes: [50, 100]
default_sort:
  - key: createdAt
    direction: desc
  - key: name
    direction: asc
template:
  unfilled_marker: "[blank]"
fetch:
  base_url: https://erp.example.com
  limit: 2000
preferences_dir: /var/lib/estate/prefs
"#
    )
    .unwrap();

    let config = ListingConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.items_per_page, 50);
    assert_eq!(config.page_sizes, vec![50, 100]);
    assert_eq!(
        config.default_sort,
        vec![SortRule::desc(SortKey::CreatedAt), SortRule::asc(SortKey::Name)]
    );
    assert_eq!(config.template.unfilled_marker, "[blank]");
    assert_eq!(config.template.page_delimiter, DEFAULT_PAGE_DELIMITER);
    assert_eq!(config.fetch.base_url.as_deref(), Some("https://erp.example.com"));
    assert_eq!(config.fetch.limit, Some(2000));
    assert_eq!(config.preferences_dir.as_deref(), Some("/var/lib/estate/prefs"));
}

#[test]
fn test_invalid_file_reports_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "page_sizes: [20, 0]").unwrap();

    let err = ListingConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap_err();
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::InvalidValue { field, value, .. }) => {
            assert_eq!(field, "page_sizes");
            assert_eq!(value, "0");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_sort_key_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "default_sort:\n  - key: bogus\n    direction: asc").unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let err = ListingConfig::from_yaml_file(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ParseError { file: Some(f), .. }) if *f == path
    ));
}
