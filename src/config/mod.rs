pub mod catalog;
pub mod constants;
pub mod settings;

pub use catalog::{Catalog, EndpointCandidate, PayloadShape, Slot};
pub use settings::Settings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Catalog(#[source] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
