// * Transport seam between the probing engine and the HTTP client.
// * The engine only ever talks to `dyn Transport`, so it can be driven by a scripted fake.

use crate::network::errors::NetworkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// How a POST body is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    #[default]
    Json,
    Form,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Query(Map<String, Value>),
    Form(Map<String, Value>),
    Json(Value),
}

/// A single outbound request to the portal
#[derive(Debug, Clone, PartialEq)]
pub struct PortalRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: RequestBody,
    /// Overrides the client's default socket timeout
    pub timeout_secs: Option<u64>,
}

impl PortalRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            body: RequestBody::None,
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Builds a request carrying `params` the way `method`/`encoding` dictate
    pub fn with_params(
        url: impl Into<String>,
        method: HttpMethod,
        encoding: BodyEncoding,
        params: Map<String, Value>,
    ) -> Self {
        let body = match (method, encoding) {
            (HttpMethod::Get, _) => RequestBody::Query(params),
            (HttpMethod::Post, BodyEncoding::Json) => RequestBody::Json(Value::Object(params)),
            (HttpMethod::Post, BodyEncoding::Form) => RequestBody::Form(params),
        };
        Self {
            url: url.into(),
            method,
            body,
            timeout_secs: None,
        }
    }

    /// Flattens params into string pairs for query strings and form bodies
    pub fn string_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
        params
            .iter()
            .map(|(k, v)| (k.clone(), value_to_param(v)))
            .collect()
    }
}

fn value_to_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A 2xx response from the portal
#[derive(Debug, Clone, PartialEq)]
pub struct PortalResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl PortalResponse {
    /// Parsed JSON body, or `None` when the body is not JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request; non-2xx statuses come back as `NetworkError::Status`
    async fn send(&self, request: &PortalRequest) -> Result<PortalResponse, NetworkError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Map<String, Value> {
        json!({"apbaId": "C0221", "pageIndex": 1})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_get_uses_query() {
        let req = PortalRequest::with_params("https://x.test", HttpMethod::Get, BodyEncoding::Form, params());
        assert!(matches!(req.body, RequestBody::Query(_)));
    }

    #[test]
    fn test_post_respects_encoding() {
        let json_req = PortalRequest::with_params("https://x.test", HttpMethod::Post, BodyEncoding::Json, params());
        assert!(matches!(json_req.body, RequestBody::Json(Value::Object(_))));

        let form_req = PortalRequest::with_params("https://x.test", HttpMethod::Post, BodyEncoding::Form, params());
        assert!(matches!(form_req.body, RequestBody::Form(_)));
    }

    #[test]
    fn test_string_pairs_stringifies_numbers() {
        let pairs = PortalRequest::string_pairs(&params());
        assert!(pairs.contains(&("pageIndex".to_string(), "1".to_string())));
        assert!(pairs.contains(&("apbaId".to_string(), "C0221".to_string())));
    }

    #[test]
    fn test_response_json_and_text() {
        let resp = PortalResponse {
            url: "https://x.test".into(),
            status: 200,
            content_type: Some("text/html".into()),
            body: b"<html></html>".to_vec(),
        };
        assert!(resp.json().is_none());
        assert_eq!(resp.text(), "<html></html>");
    }
}
