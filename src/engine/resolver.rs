// * PDF-Link Resolver
// * Phase 1 probes detail endpoints for attachment lists in JSON.
// * Phase 2 scrapes the detail page HTML when phase 1 finds nothing.

use crate::config::catalog::Catalog;
use crate::engine::candidates::first_success;
use crate::engine::normalization::{dedupe_preserving_order, normalize_href, resolve_against_origin};
use crate::engine::normalizer::{all_aliases, first_alias, scalar_text, ReportCandidate};
use crate::network::errors::NetworkError;
use crate::network::transport::{BodyEncoding, HttpMethod, PortalRequest, Transport};
use crate::ops::telemetry::record_pdf_resolution;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static SELECTOR_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Invalid anchor selector"));

static PATTERN_ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>()]+"#).expect("Invalid absolute URL regex")
});

static PATTERN_DOWNLOAD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/download/[^\s"'<>()]+"#).expect("Invalid download path regex")
});

/// Identifiers that scope the lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    pub org_code: String,
    pub report_type: String,
}

/// Where a PDF link was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvePhase {
    Json { endpoint: String },
    Html { page: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLink {
    pub url: String,
    pub phase: ResolvePhase,
}

pub struct PdfResolver {
    transport: Arc<dyn Transport>,
    catalog: Arc<Catalog>,
}

impl PdfResolver {
    pub fn new(transport: Arc<dyn Transport>, catalog: Arc<Catalog>) -> Self {
        Self { transport, catalog }
    }

    /// Finds one PDF URL for `entry`, or `None` when both phases come up empty
    pub async fn resolve(&self, entry: &ReportCandidate, ctx: &ResolveContext) -> Option<PdfLink> {
        if let Some(link) = self.resolve_from_json(entry, ctx).await {
            record_pdf_resolution("json");
            info!(url = %link.url, "pdf resolved from detail JSON");
            return Some(link);
        }

        let Some(detail_url) = entry.detail_url.as_deref() else {
            record_pdf_resolution("none");
            warn!(title = %entry.title, "no detail URL; html phase skipped");
            return None;
        };

        match self.resolve_from_html(detail_url).await {
            Some(link) => {
                record_pdf_resolution("html");
                info!(url = %link.url, "pdf resolved from detail page");
                Some(link)
            }
            None => {
                record_pdf_resolution("none");
                warn!(title = %entry.title, detail_url, "no pdf link found");
                None
            }
        }
    }

    /// Requests for phase 1 in the order they are tried
    pub fn json_requests(&self, entry: &ReportCandidate, ctx: &ResolveContext) -> Vec<PortalRequest> {
        let mut requests = Vec::new();

        // * An explicit detail-API link on the entry goes first
        if let Some(api_url) = first_alias(&entry.raw, &self.catalog.fields.detail_api_url) {
            requests.push(PortalRequest::get(resolve_against_origin(&api_url, &self.catalog.origin)));
        }

        let param_sets = parameter_sets(&entry.raw, &self.catalog.fields.id, ctx);
        for endpoint in &self.catalog.detail_endpoints {
            for params in &param_sets {
                for method in [HttpMethod::Get, HttpMethod::Post] {
                    requests.push(PortalRequest::with_params(
                        endpoint.clone(),
                        method,
                        BodyEncoding::Json,
                        params.clone(),
                    ));
                }
            }
        }
        requests
    }

    async fn resolve_from_json(&self, entry: &ReportCandidate, ctx: &ResolveContext) -> Option<PdfLink> {
        let requests = self.json_requests(entry, ctx);
        if requests.is_empty() {
            debug!(title = %entry.title, "no identifiers for detail lookup");
            return None;
        }

        let attempts = requests.into_iter().map(|request| {
            let transport = Arc::clone(&self.transport);
            let catalog = Arc::clone(&self.catalog);
            move || async move {
                let response = transport.send(&request).await?;
                let found = response
                    .json()
                    .and_then(|body| find_pdf_in_json(&body, &catalog))
                    .map(|url| PdfLink {
                        url,
                        phase: ResolvePhase::Json {
                            endpoint: request.url.clone(),
                        },
                    });
                Ok::<_, NetworkError>(found)
            }
        });

        match first_success(attempts).await {
            Ok(link) => Some(link),
            Err(exhausted) => {
                debug!(
                    attempts = exhausted.attempts,
                    last_error = ?exhausted.last_error.map(|e| e.to_string()),
                    "detail JSON phase found nothing"
                );
                None
            }
        }
    }

    async fn resolve_from_html(&self, detail_url: &str) -> Option<PdfLink> {
        let response = match self.transport.send(&PortalRequest::get(detail_url)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(detail_url, error = %e, "detail page fetch failed");
                return None;
            }
        };

        // * Relative hrefs resolve against the page actually served, after redirects
        let page_url = response.url.as_str();
        let links = scrape_pdf_links(&response.text(), page_url, &self.catalog.link_indicators);
        debug!(detail_url, page_url, found = links.len(), "scraped candidate links");

        pick_best_link(&links).map(|url| PdfLink {
            url,
            phase: ResolvePhase::Html {
                page: detail_url.to_string(),
            },
        })
    }
}

/// Smallest set first: the bare identifier, then identifier plus context
fn parameter_sets(raw: &Map<String, Value>, id_aliases: &[String], ctx: &ResolveContext) -> Vec<Map<String, Value>> {
    let mut sets = Vec::new();
    for (alias, id) in all_aliases(raw, id_aliases) {
        let mut bare = Map::new();
        bare.insert(alias, Value::from(id));

        let mut scoped = bare.clone();
        scoped.insert("apbaId".into(), Value::from(ctx.org_code.clone()));
        scoped.insert("reportFormRootNo".into(), Value::from(ctx.report_type.clone()));

        sets.push(bare);
        sets.push(scoped);
    }
    sets
}

/// Searches attachment lists at the top level, then one level down
pub fn find_pdf_in_json(body: &Value, catalog: &Catalog) -> Option<String> {
    let map = body.as_object()?;
    if let Some(url) = pdf_in_attachment_lists(map, catalog) {
        return Some(url);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|inner| pdf_in_attachment_lists(inner, catalog))
}

fn pdf_in_attachment_lists(map: &Map<String, Value>, catalog: &Catalog) -> Option<String> {
    catalog.attachments.list_keys.iter().find_map(|key| {
        map.get(key)?
            .as_array()?
            .iter()
            .find_map(|file| pdf_url_of(file, catalog))
    })
}

fn pdf_url_of(file: &Value, catalog: &Catalog) -> Option<String> {
    let aliases = &catalog.attachments;
    match file {
        Value::String(link) if link.to_lowercase().contains(".pdf") => {
            Some(resolve_against_origin(link, &catalog.origin))
        }
        Value::Object(fields) => {
            let url = first_alias(fields, &aliases.url_keys)?;

            let ext_is_pdf = first_alias(fields, &aliases.ext_keys)
                .map(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            let name_is_pdf = aliases
                .name_keys
                .iter()
                .filter_map(|key| fields.get(key).and_then(scalar_text))
                .any(|name| name.to_lowercase().contains(".pdf"));
            let url_is_pdf = url.to_lowercase().contains(".pdf");

            (ext_is_pdf || name_is_pdf || url_is_pdf).then(|| resolve_against_origin(&url, &catalog.origin))
        }
        _ => None,
    }
}

/// Collects PDF/download links from a detail page, de-duplicated in first-seen order
pub fn scrape_pdf_links(html: &str, page_url: &str, indicators: &[String]) -> Vec<String> {
    let matches_indicator = |link: &str| {
        let lower = link.to_lowercase();
        indicators.iter().any(|ind| lower.contains(ind.as_str()))
    };

    let mut links = Vec::new();

    let document = Html::parse_document(html);
    for anchor in document.select(&SELECTOR_ANCHOR) {
        if let Some(href) = anchor.value().attr("href") {
            if matches_indicator(href) {
                if let Some(url) = normalize_href(href, page_url) {
                    links.push(url);
                }
            }
        }
    }

    // * Raw scan catches links built in scripts or data attributes
    for found in PATTERN_ABSOLUTE_URL.find_iter(html) {
        if matches_indicator(found.as_str()) {
            if let Some(url) = normalize_href(found.as_str(), page_url) {
                links.push(url);
            }
        }
    }
    for found in PATTERN_DOWNLOAD_PATH.find_iter(html) {
        if matches_indicator(found.as_str()) {
            if let Some(url) = normalize_href(found.as_str(), page_url) {
                links.push(url);
            }
        }
    }

    dedupe_preserving_order(links)
}

/// First link with a literal `.pdf`, else the first link
pub fn pick_best_link(links: &[String]) -> Option<String> {
    links
        .iter()
        .find(|link| link.to_lowercase().contains(".pdf"))
        .or_else(|| links.first())
        .cloned()
}
