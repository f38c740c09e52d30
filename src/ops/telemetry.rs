// * Telemetry - JSON Logging and in-process Prometheus Metrics
// * Metrics are rendered on demand by the terminal front-end; there is no metrics server.

use crate::network::transport::HttpMethod;
use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Default filter when RUST_LOG is unset
const DEFAULT_FILTER: &str = "report_digest=info,warn";

lazy_static! {
    // * Probe attempts by outcome (hit | miss | error)
    pub static ref PROBE_ATTEMPTS_TOTAL: CounterVec = register_counter_vec!(
        "report_digest_probe_attempts_total",
        "Endpoint probe attempts by outcome",
        &["outcome"]
    ).unwrap();

    // * PDF resolutions by phase (json | html | none)
    pub static ref PDF_RESOLUTIONS_TOTAL: CounterVec = register_counter_vec!(
        "report_digest_pdf_resolutions_total",
        "PDF link resolutions by the phase that produced them",
        &["phase"]
    ).unwrap();

    // * Times the secondary PDF extractor was needed
    pub static ref EXTRACTION_FALLBACKS_TOTAL: Counter = register_counter!(
        "report_digest_extraction_fallbacks_total",
        "PDF text extractions that fell back to the secondary extractor"
    ).unwrap();

    // * LLM calls by stage (chunk | aggregate)
    pub static ref LLM_CALLS_TOTAL: CounterVec = register_counter_vec!(
        "report_digest_llm_calls_total",
        "Completion requests by summarization stage",
        &["stage"]
    ).unwrap();

    // * Portal request duration histogram
    pub static ref REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "report_digest_request_duration_seconds",
        "Portal request duration in seconds",
        &["method"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]
    ).unwrap();
}

// * Initializes JSON logging to stderr; stdout belongs to the interactive UI.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("report_digest=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}

/// Renders all registered metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_probe_attempt(outcome: &str) {
    PROBE_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_pdf_resolution(phase: &str) {
    PDF_RESOLUTIONS_TOTAL.with_label_values(&[phase]).inc();
}

pub fn record_extraction_fallback() {
    EXTRACTION_FALLBACKS_TOTAL.inc();
}

pub fn record_llm_call(stage: &str) {
    LLM_CALLS_TOTAL.with_label_values(&[stage]).inc();
}

pub fn record_request_duration(method: HttpMethod, seconds: f64) {
    let label = match method {
        HttpMethod::Get => "get",
        HttpMethod::Post => "post",
    };
    REQUEST_DURATION_SECONDS
        .with_label_values(&[label])
        .observe(seconds);
}
