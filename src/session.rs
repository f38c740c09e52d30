// * Per-user session state.
// * Holds everything one interactive run remembers between actions; nothing is persisted.

use crate::config::constants::{
    DEFAULT_ORG_CODE, DEFAULT_PAGE_SIZE, DEFAULT_REPORT_TYPE, TEXT_PREVIEW_GRAPHEMES,
};
use crate::engine::normalizer::ReportCandidate;
use crate::engine::prober::ListProbeResult;
use crate::summarizer::SummaryModel;
use unicode_segmentation::UnicodeSegmentation;

/// Values from the search inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInputs {
    pub org_code: String,
    pub report_type: String,
    pub page_size: u32,
    pub model: SummaryModel,
}

impl Default for SearchInputs {
    fn default() -> Self {
        Self {
            org_code: DEFAULT_ORG_CODE.to_string(),
            report_type: DEFAULT_REPORT_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            model: SummaryModel::default(),
        }
    }
}

/// Read-only intermediate state shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugPanel {
    pub probe: Option<String>,
    pub pdf_url: Option<String>,
    pub text_chars: usize,
    pub text_preview: Option<String>,
    pub outcome: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub inputs: SearchInputs,
    pub last_probe: Option<ListProbeResult>,
    pub candidates: Vec<ReportCandidate>,
    pub page: u32,
    pub total: Option<u64>,
    pub debug: DebugPanel,
    api_key: Option<String>,
}

impl SessionContext {
    pub fn new(inputs: SearchInputs) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    /// Key entered in the UI; takes precedence over the environment
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then(|| key.trim().to_string());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Replaces the candidate list with a freshly probed first page
    pub fn replace_listing(
        &mut self,
        probe: ListProbeResult,
        candidates: Vec<ReportCandidate>,
        total: Option<u64>,
    ) {
        self.debug.probe = Some(probe.describe());
        self.last_probe = Some(probe);
        self.candidates = candidates;
        self.total = total;
        self.page = 1;
    }

    /// Replaces the candidate list with another page of the remembered probe
    pub fn replace_page(&mut self, page: u32, candidates: Vec<ReportCandidate>, total: Option<u64>) {
        self.candidates = candidates;
        self.page = page;
        if total.is_some() {
            self.total = total;
        }
    }

    /// Number of pages implied by the total, when the portal reported one
    pub fn total_pages(&self) -> Option<u32> {
        let total = self.total?;
        let size = u64::from(self.inputs.page_size.max(1));
        Some(u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX))
    }

    pub fn record_text(&mut self, text: &str) {
        self.debug.text_chars = text.chars().count();
        self.debug.text_preview = Some(preview(text, TEXT_PREVIEW_GRAPHEMES));
    }
}

/// First `limit` grapheme clusters of `text`, with an ellipsis when truncated
pub fn preview(text: &str, limit: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(limit).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
