#![allow(dead_code)]

use async_trait::async_trait;
use report_digest::network::{HttpMethod, NetworkError, PortalRequest, PortalResponse, Transport};
use report_digest::summarizer::{CompletionModel, SummarizerError};
use serde_json::Value;
use std::sync::Mutex;

enum Reply {
    Body { content_type: &'static str, body: Vec<u8> },
    Status(u16),
}

struct Rule {
    method: HttpMethod,
    url: String,
    /// URL reported after redirects; defaults to the requested one
    final_url: Option<String>,
    reply: Reply,
}

/// Transport answering from a fixed script and recording every request.
/// Unscripted requests fail with HTTP 404.
#[derive(Default)]
pub struct ScriptedTransport {
    rules: Vec<Rule>,
    calls: Mutex<Vec<PortalRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, method: HttpMethod, url: &str, body: Value) -> Self {
        self.rules.push(Rule {
            method,
            url: url.to_string(),
            final_url: None,
            reply: Reply::Body {
                content_type: "application/json",
                body: body.to_string().into_bytes(),
            },
        });
        self
    }

    pub fn html(mut self, url: &str, body: &str) -> Self {
        self.rules.push(Rule {
            method: HttpMethod::Get,
            url: url.to_string(),
            final_url: None,
            reply: Reply::Body {
                content_type: "text/html",
                body: body.as_bytes().to_vec(),
            },
        });
        self
    }

    /// HTML served from `final_url` after a redirect away from `url`
    pub fn html_redirected(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.rules.push(Rule {
            method: HttpMethod::Get,
            url: url.to_string(),
            final_url: Some(final_url.to_string()),
            reply: Reply::Body {
                content_type: "text/html",
                body: body.as_bytes().to_vec(),
            },
        });
        self
    }

    pub fn bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.rules.push(Rule {
            method: HttpMethod::Get,
            url: url.to_string(),
            final_url: None,
            reply: Reply::Body {
                content_type: "application/pdf",
                body: body.to_vec(),
            },
        });
        self
    }

    pub fn status(mut self, method: HttpMethod, url: &str, status: u16) -> Self {
        self.rules.push(Rule {
            method,
            url: url.to_string(),
            final_url: None,
            reply: Reply::Status(status),
        });
        self
    }

    pub fn calls(&self) -> Vec<PortalRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|r| r.url).collect()
    }

    fn answer(&self, request: &PortalRequest) -> Result<PortalResponse, NetworkError> {
        self.calls.lock().unwrap().push(request.clone());

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.method == request.method && rule.url == request.url);

        match rule.map(|r| (&r.reply, r.final_url.as_ref())) {
            Some((Reply::Body { content_type, body }, final_url)) => Ok(PortalResponse {
                url: final_url.unwrap_or(&request.url).clone(),
                status: 200,
                content_type: Some(content_type.to_string()),
                body: body.clone(),
            }),
            Some((Reply::Status(status), _)) => Err(NetworkError::Status {
                status: *status,
                url: request.url.clone(),
            }),
            None => Err(NetworkError::Status {
                status: 404,
                url: request.url.clone(),
            }),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PortalRequest) -> Result<PortalResponse, NetworkError> {
        self.answer(request)
    }
}

/// Completion model that echoes a tagged prefix of its input
#[derive(Default)]
pub struct EchoCompletion {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionModel for EchoCompletion {
    async fn complete(&self, _model: &str, _system: &str, user: &str) -> Result<String, SummarizerError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(user.to_string());
        Ok(format!("summary#{}", prompts.len()))
    }
}
