//! PDF text extraction.
//!
//! Text is pulled page by page with [`pdf_extract`]. When that fails or yields only
//! blank pages, [`lopdf`] is tried instead. A document neither library can read
//! (scanned or image-only) produces an empty string, which callers treat as a data
//! condition rather than an error.

use crate::ops::telemetry::record_extraction_fallback;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{extractor} failed: {message}")]
    Failed {
        extractor: &'static str,
        message: String,
    },

    #[error("{0} panicked (malformed document)")]
    Panicked(&'static str),
}

/// One way of turning PDF bytes into per-page text
pub trait PageTextSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Primary extractor backed by `pdf-extract`
pub struct PdfExtractSource;

impl PageTextSource for PdfExtractSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // * pdf-extract can panic on malformed input
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::Failed {
                extractor: self.name(),
                message: e.to_string(),
            }),
            Err(_) => Err(ExtractionError::Panicked(self.name())),
        }
    }
}

/// Fallback extractor backed by `lopdf`
pub struct LopdfSource;

impl PageTextSource for LopdfSource {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Vec<String>, lopdf::Error> {
            let doc = lopdf::Document::load_mem(pdf)?;
            let mut pages = Vec::new();
            for page_num in doc.get_pages().keys() {
                // * A single unreadable page should not sink the document
                pages.push(doc.extract_text(&[*page_num]).unwrap_or_default());
            }
            Ok(pages)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::Failed {
                extractor: self.name(),
                message: e.to_string(),
            }),
            Err(_) => Err(ExtractionError::Panicked(self.name())),
        }
    }
}

/// Primary extractor with a single fallback
pub struct PdfTextExtractor {
    primary: Box<dyn PageTextSource>,
    fallback: Box<dyn PageTextSource>,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self::with_sources(Box::new(PdfExtractSource), Box::new(LopdfSource))
    }

    pub fn with_sources(primary: Box<dyn PageTextSource>, fallback: Box<dyn PageTextSource>) -> Self {
        Self { primary, fallback }
    }

    /// Extracts text from PDF bytes; empty when nothing is extractable
    pub fn extract(&self, pdf: &[u8]) -> String {
        match self.primary.pages(pdf) {
            Ok(pages) if !all_blank(&pages) => {
                debug!(extractor = self.primary.name(), pages = pages.len(), "pdf text extracted");
                return pages.join("\n");
            }
            Ok(pages) => {
                debug!(extractor = self.primary.name(), pages = pages.len(), "only blank pages");
            }
            Err(e) => {
                warn!(error = %e, "primary pdf extraction failed");
            }
        }

        record_extraction_fallback();
        match self.fallback.pages(pdf) {
            Ok(pages) => {
                debug!(extractor = self.fallback.name(), pages = pages.len(), "fallback extraction finished");
                if all_blank(&pages) {
                    String::new()
                } else {
                    pages.join("\n")
                }
            }
            Err(e) => {
                warn!(error = %e, "fallback pdf extraction failed");
                String::new()
            }
        }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn all_blank(pages: &[String]) -> bool {
    pages.iter().all(|p| p.trim().is_empty())
}

/// Returns true if the bytes start with the PDF magic header
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        output: Result<Vec<String>, ()>,
        calls: Arc<AtomicUsize>,
    }

    impl PageTextSource for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn pages(&self, _pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output.clone().map_err(|_| ExtractionError::Failed {
                extractor: self.name,
                message: "scripted".into(),
            })
        }
    }

    fn scripted(name: &'static str, output: Result<Vec<&str>, ()>) -> (Box<dyn PageTextSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            name,
            output: output.map(|pages| pages.into_iter().map(String::from).collect()),
            calls: Arc::clone(&calls),
        };
        (Box::new(source), calls)
    }

    #[test]
    fn test_primary_text_is_used() {
        let (primary, _) = scripted("primary", Ok(vec!["page one", "page two"]));
        let (fallback, fallback_calls) = scripted("fallback", Ok(vec!["unused"]));
        let extractor = PdfTextExtractor::with_sources(primary, fallback);

        assert_eq!(extractor.extract(b"%PDF-"), "page one\npage two");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_primary_invokes_fallback() {
        let (primary, _) = scripted("primary", Ok(vec!["  ", "\n"]));
        let (fallback, fallback_calls) = scripted("fallback", Ok(vec!["recovered"]));
        let extractor = PdfTextExtractor::with_sources(primary, fallback);

        assert_eq!(extractor.extract(b"%PDF-"), "recovered");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_primary_invokes_fallback() {
        let (primary, _) = scripted("primary", Err(()));
        let (fallback, _) = scripted("fallback", Ok(vec!["a", "b"]));
        let extractor = PdfTextExtractor::with_sources(primary, fallback);

        assert_eq!(extractor.extract(b"%PDF-"), "a\nb");
    }

    #[test]
    fn test_nothing_extractable_is_empty() {
        let (primary, _) = scripted("primary", Ok(vec![""]));
        let (fallback, _) = scripted("fallback", Err(()));
        let extractor = PdfTextExtractor::with_sources(primary, fallback);

        assert_eq!(extractor.extract(b"%PDF-"), "");
    }

    #[test]
    fn test_garbage_bytes_yield_empty_text() {
        let extractor = PdfTextExtractor::new();
        assert_eq!(extractor.extract(b"not a pdf at all"), "");
    }

    #[test]
    fn test_pdf_magic() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(!looks_like_pdf(b"<html>"));
    }
}
