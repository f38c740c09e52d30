use std::collections::HashSet;
use url::Url;

// * Resolves a link taken from a JSON payload.
// * Root-relative ("/...") and protocol-relative ("//host/...") links are joined to the
// * site origin; anything else is kept verbatim.
pub fn resolve_against_origin(link: &str, origin: &str) -> String {
    let link = link.trim();
    if link.starts_with("//") {
        if let Some(joined) = Url::parse(origin).ok().and_then(|base| base.join(link).ok()) {
            return joined.to_string();
        }
        return link.to_string();
    }
    if link.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), link);
    }
    link.to_string()
}

// * Normalizes an href scraped from an HTML page into an absolute URL.
// *
// * Logic:
// * 1. Join href with the page URL.
// * 2. Strip Fragment (#).
// * 3. Lowercase Hostname.
// * Query parameters are kept in their original order; download links depend on them.
pub fn normalize_href(href: &str, base_url: &str) -> Option<String> {
    // * Step 1: Parse Base and Join
    let base = Url::parse(base_url).ok()?;
    let mut url = base.join(href.trim()).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    // * Step 2: Strip Fragment
    url.set_fragment(None);

    // * Step 3: Lowercase Hostname
    if let Some(host) = url.host_str() {
        let lower_host = host.to_lowercase();
        if url.set_host(Some(&lower_host)).is_err() {
            return None;
        }
    }

    Some(url.to_string())
}

// * Removes duplicates while keeping the first-seen order.
pub fn dedupe_preserving_order<I>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
