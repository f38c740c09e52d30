// * Action handlers behind the two user buttons:
// * (1) list probe and (2) PDF resolution + extraction + summarization.

use crate::config::constants::DOWNLOAD_TIMEOUT_SECS;
use crate::config::{Catalog, ConfigError, Settings};
use crate::engine::normalizer::{normalize_entries, ReportCandidate};
use crate::engine::prober::{ListProber, ListQuery, ProbeError};
use crate::engine::resolver::{PdfResolver, ResolveContext};
use crate::network::errors::NetworkError;
use crate::network::transport::{PortalRequest, Transport};
use crate::network::PortalClient;
use crate::refinery::pdf_text::{looks_like_pdf, PdfTextExtractor};
use crate::session::SessionContext;
use crate::summarizer::{CompletionModel, OpenAiClient, Summarizer, SummarizerError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Every failure the user can see, flattened to one message
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("List lookup failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Summarization failed: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error("OPENAI_API_KEY not set")]
    MissingCredential,

    #[error("No report list yet; fetch the list first")]
    NoListing,

    #[error("Report #{index} does not exist (list has {len})")]
    InvalidSelection { index: usize, len: usize },
}

/// Result of the summarize action
#[derive(Debug, Clone, PartialEq)]
pub enum DigestOutcome {
    Summary {
        title: String,
        pdf_url: String,
        summary: String,
        chunk_count: usize,
    },
    NoPdfFound {
        title: String,
    },
    NoTextExtracted {
        title: String,
        pdf_url: String,
    },
}

impl DigestOutcome {
    /// Short status line for the UI
    pub fn status_line(&self) -> String {
        match self {
            DigestOutcome::Summary { title, chunk_count, .. } => {
                format!("Summarized '{title}' from {chunk_count} chunk(s)")
            }
            DigestOutcome::NoPdfFound { title } => format!("No PDF found for '{title}'"),
            DigestOutcome::NoTextExtracted { title, .. } => {
                format!("The PDF for '{title}' has no extractable text (scanned or image-only)")
            }
        }
    }
}

pub struct Pipeline {
    transport: Arc<dyn Transport>,
    settings: Settings,
    prober: ListProber,
    resolver: PdfResolver,
    extractor: PdfTextExtractor,
    catalog: Arc<Catalog>,
    completion: Option<Arc<dyn CompletionModel>>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>, catalog: Catalog, settings: Settings) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            prober: ListProber::new(Arc::clone(&transport), Arc::clone(&catalog)),
            resolver: PdfResolver::new(Arc::clone(&transport), Arc::clone(&catalog)),
            extractor: PdfTextExtractor::new(),
            transport,
            settings,
            catalog,
            completion: None,
        }
    }

    /// Real HTTP client and catalog as configured
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let catalog = settings.load_catalog()?;
        let client = PortalClient::new(settings.request_timeout_secs)?;
        Ok(Self::new(Arc::new(client), catalog, settings))
    }

    /// Uses `llm` instead of building an OpenAI client from the API key
    pub fn with_completion_model(mut self, llm: Arc<dyn CompletionModel>) -> Self {
        self.completion = Some(llm);
        self
    }

    pub fn with_extractor(mut self, extractor: PdfTextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Button 1: probe for the first page and replace the session's list
    pub async fn fetch_list(&self, session: &mut SessionContext) -> Result<usize, AppError> {
        let query = ListQuery {
            org_code: session.inputs.org_code.clone(),
            report_type: session.inputs.report_type.clone(),
            page: 1,
            page_size: session.inputs.page_size,
        };

        let (probe, page) = match self.prober.probe(&query).await {
            Ok(hit) => hit,
            Err(e) => {
                session.debug.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let candidates = normalize_entries(&page.entries, &self.catalog);
        let count = candidates.len();
        info!(count, total = ?page.total, "report list fetched");

        session.debug.last_error = None;
        session.replace_listing(probe, candidates, page.total);
        Ok(count)
    }

    /// Fetches another page with the remembered probe result
    pub async fn fetch_page(&self, session: &mut SessionContext, page: u32) -> Result<usize, AppError> {
        let probe = session.last_probe.clone().ok_or(AppError::NoListing)?;
        let page = page.max(1);

        let fetched = match self.prober.fetch_page(&probe, page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                session.debug.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let candidates = normalize_entries(&fetched.entries, &self.catalog);
        let count = candidates.len();
        info!(page, count, "report page fetched");

        session.debug.last_error = None;
        session.replace_page(page, candidates, fetched.total);
        Ok(count)
    }

    /// Button 2: resolve, download, extract and summarize the chosen report
    pub async fn digest_selected(
        &self,
        session: &mut SessionContext,
        index: usize,
    ) -> Result<DigestOutcome, AppError> {
        let candidate = session
            .candidates
            .get(index)
            .cloned()
            .ok_or(AppError::InvalidSelection {
                index,
                len: session.candidates.len(),
            })?;

        // * Credentials are checked before any network activity
        let llm = self.completion_model(session)?;

        let result = self.digest(session, &candidate, llm).await;
        match &result {
            Ok(outcome) => {
                session.debug.outcome = Some(outcome.status_line());
                session.debug.last_error = None;
            }
            Err(e) => session.debug.last_error = Some(e.to_string()),
        }
        result
    }

    fn completion_model(&self, session: &SessionContext) -> Result<Arc<dyn CompletionModel>, AppError> {
        let api_key = session
            .api_key()
            .or(self.settings.openai_api_key.as_deref())
            .ok_or(AppError::MissingCredential)?;

        match &self.completion {
            Some(llm) => Ok(Arc::clone(llm)),
            None => Ok(Arc::new(OpenAiClient::new(api_key, &self.settings.openai_base_url)?)),
        }
    }

    async fn digest(
        &self,
        session: &mut SessionContext,
        candidate: &ReportCandidate,
        llm: Arc<dyn CompletionModel>,
    ) -> Result<DigestOutcome, AppError> {
        let ctx = ResolveContext {
            org_code: session.inputs.org_code.clone(),
            report_type: session.inputs.report_type.clone(),
        };

        session.debug.pdf_url = None;
        session.debug.text_preview = None;
        session.debug.text_chars = 0;

        let Some(link) = self.resolver.resolve(candidate, &ctx).await else {
            return Ok(DigestOutcome::NoPdfFound {
                title: candidate.title.clone(),
            });
        };
        session.debug.pdf_url = Some(link.url.clone());

        let bytes = self.download(&link.url).await?;
        let text = self.extractor.extract(&bytes);
        session.record_text(&text);

        if text.trim().is_empty() {
            return Ok(DigestOutcome::NoTextExtracted {
                title: candidate.title.clone(),
                pdf_url: link.url,
            });
        }

        let report = Summarizer::new(llm)
            .summarize(session.inputs.model, &text)
            .await?;

        Ok(DigestOutcome::Summary {
            title: candidate.title.clone(),
            pdf_url: link.url,
            summary: report.summary,
            chunk_count: report.chunk_count,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let request = PortalRequest::get(url).with_timeout(DOWNLOAD_TIMEOUT_SECS);
        let response = self.transport.send(&request).await?;
        if !looks_like_pdf(&response.body) {
            warn!(url, content_type = ?response.content_type, "download does not start with %PDF-");
        }
        info!(url, bytes = response.body.len(), "pdf downloaded");
        Ok(response.body)
    }
}
