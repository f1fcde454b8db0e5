use thiserror::Error;

/// Contract violations. Data-quality problems never surface here; they land
/// in fallback buckets instead.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("invalid {kind} pattern {pattern:?}: {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings source error: {0}")]
    Source(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ListingError>;
