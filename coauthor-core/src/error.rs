/// Top-level coauthor error type.
///
/// All fallible operations in `coauthor-core` return [`Result<T, CoauthorError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
///
/// The graph builder and styling policy never produce errors: they are total
/// over well-formed articles.
#[derive(thiserror::Error, Debug)]
pub enum CoauthorError {
    /// Error talking to the literature service or reading its responses.
    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    /// Error during output rendering (HTML page, JSON export).
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from a literature source (`PubMed` E-utilities or a fixture file).
///
/// Inside the collector every one of these is recovered locally: the failing
/// search or batch contributes nothing and collection continues.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    /// Network-level failure reaching the service.
    #[error("PubMed API network error: {0}")]
    Network(String),

    /// The service returned a non-success HTTP status.
    #[error("PubMed API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code from the service.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The service answered, but the body could not be parsed.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// The service answered with an explicit error message in its body.
    #[error("PubMed API rejected request: {0}")]
    Rejected(String),

    /// Reading a fixture file failed.
    #[error("Fixture IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors during the rendering stage.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Filesystem I/O error writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Render spec could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors in coauthor configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, CoauthorError>`.
pub type Result<T> = std::result::Result<T, CoauthorError>;
