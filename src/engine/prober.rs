// * Endpoint Prober
// * Walks the catalog's (endpoint x payload shape x type token) cross-product in declaration
// * order and keeps the first combination that answers with a non-empty entry list.

use crate::config::catalog::{Catalog, EndpointCandidate, PayloadShape, Slot};
use crate::engine::candidates::{first_success, Exhausted};
use crate::engine::normalizer::{list_at_path, locate_list, locate_total};
use crate::network::errors::NetworkError;
use crate::network::transport::{BodyEncoding, HttpMethod, PortalRequest, Transport};
use crate::ops::telemetry::record_probe_attempt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Probe exhausted after {attempts} candidates (last error: {})", describe_last(.last_error))]
    Exhausted {
        attempts: usize,
        last_error: Option<NetworkError>,
    },

    #[error("Page request failed: {0}")]
    Page(#[from] NetworkError),

    #[error("Page response from {endpoint} is not JSON")]
    PageNotJson { endpoint: String },
}

fn describe_last(last_error: &Option<NetworkError>) -> String {
    match last_error {
        Some(e) => e.to_string(),
        None => "no candidate returned a usable list".to_string(),
    }
}

/// What the user asked to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub org_code: String,
    pub report_type: String,
    pub page: u32,
    pub page_size: u32,
}

/// The first combination that produced a usable list.
///
/// Reused for later pages without re-validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListProbeResult {
    pub endpoint: String,
    pub method: HttpMethod,
    pub encoding: BodyEncoding,
    pub payload: Map<String, Value>,
    pub list_key_path: String,
    pub total_key_path: Option<String>,
    pub extra_type_token: Option<String>,
    pub shape_name: String,
    pub page_key: Option<String>,
}

impl ListProbeResult {
    /// Payload with the page number swapped in
    pub fn payload_for_page(&self, page: u32) -> Map<String, Value> {
        let mut payload = self.payload.clone();
        if let Some(key) = &self.page_key {
            payload.insert(key.clone(), Value::from(page));
        }
        payload
    }

    pub fn request_for_page(&self, page: u32) -> PortalRequest {
        PortalRequest::with_params(
            self.endpoint.clone(),
            self.method,
            self.encoding,
            self.payload_for_page(page),
        )
    }

    /// One-line description for the debug panel
    pub fn describe(&self) -> String {
        let list_path = if self.list_key_path.is_empty() {
            "<root>"
        } else {
            &self.list_key_path
        };
        format!(
            "{} {} [{}] list={} total={} token={}",
            self.method,
            self.endpoint,
            self.shape_name,
            list_path,
            self.total_key_path.as_deref().unwrap_or("-"),
            self.extra_type_token.as_deref().unwrap_or("-"),
        )
    }
}

/// One page of raw entries
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub entries: Vec<Value>,
    pub total: Option<u64>,
    pub page: u32,
}

/// A single combination to try
#[derive(Debug, Clone)]
struct ProbePlan {
    endpoint: EndpointCandidate,
    shape: PayloadShape,
    token: Option<String>,
}

impl ProbePlan {
    fn payload(&self, query: &ListQuery) -> Map<String, Value> {
        let mut payload = Map::new();
        for field in &self.shape.fields {
            let value = match &field.slot {
                Slot::Org => Value::from(query.org_code.clone()),
                Slot::ReportType => Value::from(query.report_type.clone()),
                Slot::Page => Value::from(query.page),
                Slot::PageSize => Value::from(query.page_size),
                Slot::Literal(text) => Value::from(text.clone()),
                Slot::TypeToken => match &self.token {
                    Some(token) => Value::from(token.clone()),
                    None => continue,
                },
            };
            payload.insert(field.key.clone(), value);
        }
        payload
    }
}

pub struct ListProber {
    transport: Arc<dyn Transport>,
    catalog: Arc<Catalog>,
}

impl ListProber {
    pub fn new(transport: Arc<dyn Transport>, catalog: Arc<Catalog>) -> Self {
        Self { transport, catalog }
    }

    /// Candidate combinations in declaration order
    fn plans(&self) -> Vec<ProbePlan> {
        let mut plans = Vec::new();
        for endpoint in &self.catalog.list_endpoints {
            for shape in &self.catalog.payload_shapes {
                // * A shape is always tried at least once, token field omitted when none are configured
                let tokens: Vec<Option<String>> =
                    if shape.uses_type_token() && !self.catalog.type_tokens.is_empty() {
                        self.catalog.type_tokens.iter().cloned().map(Some).collect()
                    } else {
                        vec![None]
                    };
                for token in tokens {
                    plans.push(ProbePlan {
                        endpoint: endpoint.clone(),
                        shape: shape.clone(),
                        token,
                    });
                }
            }
        }
        plans
    }

    /// Finds the first combination yielding a non-empty list.
    ///
    /// Transport failures and structural misses both advance to the next combination;
    /// the first hit ends the search.
    pub async fn probe(&self, query: &ListQuery) -> Result<(ListProbeResult, ListPage), ProbeError> {
        let plans = self.plans();
        info!(
            org = %query.org_code,
            report_type = %query.report_type,
            candidates = plans.len(),
            "probing list endpoints"
        );

        let attempts = plans.into_iter().map(|plan| {
            let transport = Arc::clone(&self.transport);
            let catalog = Arc::clone(&self.catalog);
            move || async move { Self::attempt(transport.as_ref(), &catalog, plan, query).await }
        });

        match first_success(attempts).await {
            Ok(hit) => {
                info!(probe = %hit.0.describe(), entries = hit.1.entries.len(), "list probe succeeded");
                Ok(hit)
            }
            Err(Exhausted { attempts, last_error }) => {
                warn!(attempts, last_error = %describe_last(&last_error), "list probe exhausted");
                Err(ProbeError::Exhausted { attempts, last_error })
            }
        }
    }

    async fn attempt(
        transport: &dyn Transport,
        catalog: &Catalog,
        plan: ProbePlan,
        query: &ListQuery,
    ) -> Result<Option<(ListProbeResult, ListPage)>, NetworkError> {
        let payload = plan.payload(query);
        let request = PortalRequest::with_params(
            plan.endpoint.url.clone(),
            plan.endpoint.method,
            plan.endpoint.encoding,
            payload.clone(),
        );

        let response = match transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                record_probe_attempt("error");
                debug!(endpoint = %plan.endpoint.url, shape = %plan.shape.name, error = %e, "probe candidate failed");
                return Err(e);
            }
        };

        let Some(body) = response.json() else {
            record_probe_attempt("miss");
            debug!(endpoint = %plan.endpoint.url, shape = %plan.shape.name, "probe candidate is not JSON");
            return Ok(None);
        };

        let Some((entries, list_key_path)) = locate_list(&body, &catalog.list_keys) else {
            record_probe_attempt("miss");
            debug!(endpoint = %plan.endpoint.url, shape = %plan.shape.name, "no recognizable list");
            return Ok(None);
        };

        // ? An empty list may be a genuine zero-result query; it is treated as a miss here
        if entries.is_empty() {
            record_probe_attempt("miss");
            debug!(endpoint = %plan.endpoint.url, shape = %plan.shape.name, "empty list treated as miss");
            return Ok(None);
        }

        record_probe_attempt("hit");
        let entries = entries.clone();
        let total = locate_total(&body, &list_key_path, &catalog.total_keys);

        let result = ListProbeResult {
            endpoint: plan.endpoint.url.clone(),
            method: plan.endpoint.method,
            encoding: plan.endpoint.encoding,
            payload,
            list_key_path,
            total_key_path: total.as_ref().map(|(_, path)| path.clone()),
            extra_type_token: plan.token.clone(),
            shape_name: plan.shape.name.clone(),
            page_key: plan.shape.page_key().map(str::to_string),
        };
        let page = ListPage {
            entries,
            total: total.map(|(count, _)| count),
            page: query.page,
        };
        Ok(Some((result, page)))
    }

    /// Re-sends a remembered combination for another page.
    ///
    /// An empty list is a legitimate empty page here; nothing is re-probed.
    pub async fn fetch_page(&self, result: &ListProbeResult, page: u32) -> Result<ListPage, ProbeError> {
        let request = result.request_for_page(page);
        let response = self.transport.send(&request).await?;
        let body = response.json().ok_or_else(|| ProbeError::PageNotJson {
            endpoint: result.endpoint.clone(),
        })?;

        let entries = list_at_path(&body, &result.list_key_path)
            .cloned()
            .unwrap_or_default();
        let total = result
            .total_key_path
            .as_deref()
            .and_then(|path| count_at_path(&body, path));

        debug!(endpoint = %result.endpoint, page, entries = entries.len(), "page fetched");
        Ok(ListPage { entries, total, page })
    }
}

fn count_at_path(value: &Value, path: &str) -> Option<u64> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    match current {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
