mod common;

use common::{EchoCompletion, ScriptedTransport};
use report_digest::config::catalog::{EndpointCandidate, PayloadShape, ShapeField, Slot};
use report_digest::config::{Catalog, Settings};
use report_digest::network::{BodyEncoding, HttpMethod};
use report_digest::refinery::pdf_text::{ExtractionError, PageTextSource, PdfTextExtractor};
use report_digest::{AppError, DigestOutcome, Pipeline, SearchInputs, SessionContext};
use serde_json::json;
use std::sync::Arc;

// * End-to-end action handlers against a scripted portal

const LIST: &str = "https://portal.test/api/list";
const PDF: &str = "https://alio.go.kr/download/77.pdf";

struct FixedPages(Vec<&'static str>);

impl PageTextSource for FixedPages {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn pages(&self, _pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(self.0.iter().map(|p| p.to_string()).collect())
    }
}

fn extractor(pages: Vec<&'static str>) -> PdfTextExtractor {
    PdfTextExtractor::with_sources(Box::new(FixedPages(pages)), Box::new(FixedPages(vec![])))
}

fn catalog() -> Catalog {
    Catalog {
        list_endpoints: vec![EndpointCandidate::new(LIST, HttpMethod::Post, BodyEncoding::Json)],
        payload_shapes: vec![PayloadShape {
            name: "simple".into(),
            fields: vec![
                ShapeField {
                    key: "apbaId".into(),
                    slot: Slot::Org,
                },
                ShapeField {
                    key: "pageIndex".into(),
                    slot: Slot::Page,
                },
            ],
        }],
        ..Catalog::default()
    }
}

fn listing() -> serde_json::Value {
    json!({"list": [
        {"reportTitle": "물관리 정책 연구", "apbaNm": "K-water", "regDate": "2024-01-02",
         "detailApiUrl": "/api/detail/77"},
        {"reportTitle": "No attachments", "reportId": "88"}
    ], "totalCount": 2})
}

fn portal() -> ScriptedTransport {
    ScriptedTransport::new()
        .json(HttpMethod::Post, LIST, listing())
        .json(
            HttpMethod::Get,
            "https://alio.go.kr/api/detail/77",
            json!({"attachFiles": [{"fileExt": "pdf", "downloadUrl": "/download/77.pdf"}]}),
        )
        .bytes(PDF, b"%PDF-1.4 fake")
}

fn settings_with_key() -> Settings {
    Settings {
        openai_api_key: Some("sk-test".into()),
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_fetch_list_populates_session() {
    let transport = Arc::new(portal());
    let pipeline = Pipeline::new(transport.clone(), catalog(), Settings::default());
    let mut session = SessionContext::new(SearchInputs::default());

    let count = pipeline.fetch_list(&mut session).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(session.page, 1);
    assert_eq!(session.total, Some(2));
    assert_eq!(session.candidates[0].org, "K-water");
    assert!(session.last_probe.is_some());
    assert!(session.debug.probe.as_deref().unwrap().contains(LIST));
}

#[tokio::test]
async fn test_failed_probe_is_flattened_and_recorded() {
    let transport = Arc::new(ScriptedTransport::new());
    let pipeline = Pipeline::new(transport, catalog(), Settings::default());
    let mut session = SessionContext::default();

    let err = pipeline.fetch_list(&mut session).await.unwrap_err();

    assert!(matches!(err, AppError::Probe(_)));
    assert!(err.to_string().contains("Probe exhausted"));
    assert!(session.debug.last_error.is_some());
}

#[tokio::test]
async fn test_fetch_page_requires_listing() {
    let pipeline = Pipeline::new(Arc::new(ScriptedTransport::new()), catalog(), Settings::default());
    let mut session = SessionContext::default();

    let err = pipeline.fetch_page(&mut session, 2).await.unwrap_err();
    assert!(matches!(err, AppError::NoListing));
}

#[tokio::test]
async fn test_missing_credential_fails_before_network() {
    let transport = Arc::new(portal());
    let pipeline = Pipeline::new(transport.clone(), catalog(), Settings::default())
        .with_completion_model(Arc::new(EchoCompletion::default()));
    let mut session = SessionContext::default();
    pipeline.fetch_list(&mut session).await.unwrap();
    let calls_before = transport.calls().len();

    let err = pipeline.digest_selected(&mut session, 0).await.unwrap_err();

    assert!(matches!(err, AppError::MissingCredential));
    assert_eq!(transport.calls().len(), calls_before);
}

#[tokio::test]
async fn test_invalid_selection() {
    let pipeline = Pipeline::new(Arc::new(portal()), catalog(), settings_with_key());
    let mut session = SessionContext::default();

    let err = pipeline.digest_selected(&mut session, 3).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidSelection { index: 3, len: 0 }));
}

#[tokio::test]
async fn test_summary_end_to_end() {
    let llm = Arc::new(EchoCompletion::default());
    let pipeline = Pipeline::new(Arc::new(portal()), catalog(), settings_with_key())
        .with_completion_model(llm.clone())
        .with_extractor(extractor(vec!["연구 배경", "주요 결과"]));
    let mut session = SessionContext::default();
    pipeline.fetch_list(&mut session).await.unwrap();

    let outcome = pipeline.digest_selected(&mut session, 0).await.unwrap();

    match outcome {
        DigestOutcome::Summary {
            pdf_url,
            summary,
            chunk_count,
            ..
        } => {
            assert_eq!(pdf_url, PDF);
            assert_eq!(chunk_count, 1);
            // * One chunk call, then the aggregation call
            assert_eq!(summary, "summary#2");
        }
        other => panic!("expected a summary, got {:?}", other),
    }

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts[0], "연구 배경\n주요 결과");
    assert_eq!(prompts[1], "summary#1");
    assert_eq!(session.debug.pdf_url.as_deref(), Some(PDF));
    assert_eq!(session.debug.text_chars, "연구 배경\n주요 결과".chars().count());
}

#[tokio::test]
async fn test_no_pdf_is_an_outcome_not_an_error() {
    let pipeline = Pipeline::new(Arc::new(portal()), catalog(), settings_with_key())
        .with_completion_model(Arc::new(EchoCompletion::default()));
    let mut session = SessionContext::default();
    pipeline.fetch_list(&mut session).await.unwrap();

    let outcome = pipeline.digest_selected(&mut session, 1).await.unwrap();

    assert_eq!(
        outcome,
        DigestOutcome::NoPdfFound {
            title: "No attachments".into()
        }
    );
    assert!(outcome.status_line().contains("No PDF found"));
    assert_eq!(session.debug.outcome, Some(outcome.status_line()));
}

#[tokio::test]
async fn test_blank_pdf_is_no_text_outcome() {
    let llm = Arc::new(EchoCompletion::default());
    let pipeline = Pipeline::new(Arc::new(portal()), catalog(), settings_with_key())
        .with_completion_model(llm.clone())
        .with_extractor(extractor(vec!["   "]));
    let mut session = SessionContext::default();
    pipeline.fetch_list(&mut session).await.unwrap();

    let outcome = pipeline.digest_selected(&mut session, 0).await.unwrap();

    assert!(matches!(outcome, DigestOutcome::NoTextExtracted { .. }));
    assert!(llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_key_overrides_missing_env_key() {
    let pipeline = Pipeline::new(Arc::new(portal()), catalog(), Settings::default())
        .with_completion_model(Arc::new(EchoCompletion::default()))
        .with_extractor(extractor(vec!["text"]));
    let mut session = SessionContext::default();
    session.set_api_key("sk-from-ui");
    pipeline.fetch_list(&mut session).await.unwrap();

    let outcome = pipeline.digest_selected(&mut session, 0).await.unwrap();
    assert!(matches!(outcome, DigestOutcome::Summary { .. }));
}
