use crate::network::errors::NetworkError;
use crate::network::identity::IdentityProfile;
use crate::network::transport::{HttpMethod, PortalRequest, PortalResponse, RequestBody, Transport};
use crate::ops::telemetry::record_request_duration;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

// * The HTTP engine behind every portal call.
pub struct PortalClient {
    inner: Client,
}

impl PortalClient {
    // * Initializes the client with the portal browser identity.
    // * @param timeout_secs - Socket timeout applied to every request
    pub fn new(timeout_secs: u64) -> Result<Self, NetworkError> {
        let headers = IdentityProfile::portal_browser().header_map()?;

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { inner: client })
    }

    async fn execute(&self, request: &PortalRequest) -> Result<PortalResponse, NetworkError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|_| NetworkError::InvalidUrl(request.url.clone()))?;

        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(url),
            HttpMethod::Post => self.inner.post(url),
        };

        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Query(params) => builder.query(&PortalRequest::string_pairs(params)),
            RequestBody::Form(params) => builder.form(&PortalRequest::string_pairs(params)),
            RequestBody::Json(value) => builder.json(value),
        };

        if let Some(secs) = request.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let started = Instant::now();
        let resp = builder.send().await?;
        let status = resp.status();
        record_request_duration(request.method, started.elapsed().as_secs_f64());

        debug!(url = %request.url, method = %request.method, status = status.as_u16(), "portal response");

        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let final_url = resp.url().to_string();
        let body = resp.bytes().await?.to_vec();

        Ok(PortalResponse {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[async_trait]
impl Transport for PortalClient {
    async fn send(&self, request: &PortalRequest) -> Result<PortalResponse, NetworkError> {
        self.execute(request).await
    }
}
