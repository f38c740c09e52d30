// * Operations: structured logging and in-process metrics

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, record_extraction_fallback,
    record_llm_call, record_pdf_resolution, record_probe_attempt, record_request_duration,
};
