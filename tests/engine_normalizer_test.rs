use report_digest::config::constants::UNTITLED_PLACEHOLDER;
use report_digest::config::Catalog;
use report_digest::engine::normalizer::{locate_list, normalize_entries, normalize_entry};
use serde_json::json;

// * Test Suite for response normalization

#[test]
fn test_every_list_alias_is_recognized() {
    let catalog = Catalog::default();
    for key in &catalog.list_keys {
        let value = json!({ key.clone(): [{"title": "t"}, {"title": "u"}] });
        let (items, path) = locate_list(&value, &catalog.list_keys)
            .unwrap_or_else(|| panic!("alias {key} not recognized"));
        assert_eq!(items.len(), 2);
        assert_eq!(&path, key);
    }
}

#[test]
fn test_one_level_of_nesting() {
    let catalog = Catalog::default();
    let value = json!({"result": {"rows": [1, 2]}});
    let (items, path) = locate_list(&value, &catalog.list_keys).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(path, "result.rows");
}

#[test]
fn test_deeper_nesting_is_ignored() {
    let catalog = Catalog::default();
    let value = json!({"result": {"data": {"rows": [1, 2]}}});
    assert!(locate_list(&value, &catalog.list_keys).is_none());
}

#[test]
fn test_unrecognized_keys() {
    let catalog = Catalog::default();
    let value = json!({"payload": [1, 2], "meta": {"entries": [3]}});
    assert!(locate_list(&value, &catalog.list_keys).is_none());
}

#[test]
fn test_missing_aliases_use_defaults() {
    let catalog = Catalog::default();
    let candidate = normalize_entry(&json!({"unrelated": "x"}), &catalog).unwrap();

    assert_eq!(candidate.title, UNTITLED_PLACEHOLDER);
    assert_eq!(candidate.org, "");
    assert_eq!(candidate.date, "");
    assert_eq!(candidate.detail_url, None);
}

#[test]
fn test_alias_order_wins() {
    let catalog = Catalog::default();
    let entry = json!({
        "title": "Second choice",
        "reportTitle": "First choice",
        "apbaNm": "한국수자원공사",
        "regDate": "2024-03-01"
    });
    let candidate = normalize_entry(&entry, &catalog).unwrap();

    assert_eq!(candidate.title, "First choice");
    assert_eq!(candidate.org, "한국수자원공사");
    assert_eq!(candidate.date, "2024-03-01");
}

#[test]
fn test_non_object_entries_are_skipped() {
    let catalog = Catalog::default();
    let entries = vec![json!("text"), json!({"title": "kept"}), json!(3), json!(null)];
    let candidates = normalize_entries(&entries, &catalog);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "kept");
}

#[test]
fn test_root_relative_detail_url_uses_origin() {
    let catalog = Catalog::default();
    let candidate = normalize_entry(&json!({"detailUrl": "/report/view.do?id=5"}), &catalog).unwrap();
    assert_eq!(
        candidate.detail_url.as_deref(),
        Some("https://alio.go.kr/report/view.do?id=5")
    );
}

#[test]
fn test_absolute_detail_url_is_verbatim() {
    let catalog = Catalog::default();
    let entry = json!({"url": "https://other.test/r/5", "reportId": "5"});
    let candidate = normalize_entry(&entry, &catalog).unwrap();
    assert_eq!(candidate.detail_url.as_deref(), Some("https://other.test/r/5"));
}

#[test]
fn test_raw_entry_is_preserved() {
    let catalog = Catalog::default();
    let entry = json!({"title": "t", "reportId": 9, "extra": {"k": 1}});
    let candidate = normalize_entry(&entry, &catalog).unwrap();
    assert_eq!(serde_json::Value::Object(candidate.raw), entry);
}
