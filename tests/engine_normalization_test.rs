use report_digest::engine::normalization::normalize_href;

// * Test Suite for scraped href normalization

const PAGE: &str = "https://alio.go.kr/report/view.do?id=3";

#[test]
fn test_relative_href_joins_page_url() {
    assert_eq!(
        normalize_href("file.pdf", PAGE).unwrap(),
        "https://alio.go.kr/report/file.pdf"
    );
}

#[test]
fn test_root_relative_href() {
    assert_eq!(
        normalize_href("/download/a.pdf", PAGE).unwrap(),
        "https://alio.go.kr/download/a.pdf"
    );
}

#[test]
fn test_strip_fragment() {
    assert_eq!(
        normalize_href("/files/a.pdf#page=2", PAGE).unwrap(),
        "https://alio.go.kr/files/a.pdf"
    );
}

#[test]
fn test_lowercase_host() {
    assert_eq!(
        normalize_href("https://FILES.Alio.go.kr/a.pdf", PAGE).unwrap(),
        "https://files.alio.go.kr/a.pdf"
    );
}

#[test]
fn test_query_is_kept_in_order() {
    let normalized = normalize_href("/download/file.do?no=1&seq=2", PAGE).unwrap();
    assert_eq!(normalized, "https://alio.go.kr/download/file.do?no=1&seq=2");
}

#[test]
fn test_non_http_schemes_are_rejected() {
    assert!(normalize_href("javascript:void(0)", PAGE).is_none());
    assert!(normalize_href("mailto:info@alio.go.kr", PAGE).is_none());
}

#[test]
fn test_invalid_base() {
    assert!(normalize_href("a.pdf", "not a url").is_none());
}

#[test]
fn test_protocol_relative_json_link_gets_origin_scheme() {
    use report_digest::engine::normalization::resolve_against_origin;

    assert_eq!(
        resolve_against_origin("//files.alio.go.kr/a.pdf", "https://alio.go.kr"),
        "https://files.alio.go.kr/a.pdf"
    );
    assert_eq!(
        resolve_against_origin(" //www.alio.go.kr/view.do?id=1 ", "http://alio.go.kr"),
        "http://www.alio.go.kr/view.do?id=1"
    );
}
