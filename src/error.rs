use thiserror::Error;

/// Problems with the widget configuration. Any of these aborts `init`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("apiKey is required")]
    MissingApiKey,

    /// `includePaths` and `excludePaths` are mutually exclusive.
    #[error("includePaths and excludePaths cannot both be set")]
    ConflictingPathRules,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Problems turning a page snapshot into a host page.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error ({context}): {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid page URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("node path '{0}' does not resolve to an element")]
    NodeNotFound(String),
}

/// Why a feedback submission did not reach the collection endpoint.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("feedback text is empty")]
    EmptyFeedback,

    #[error("widget is not running")]
    NotRunning,

    #[error("failed to encode report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },

    /// The delivery worker went away without reporting a result.
    #[error("submission worker exited without a result")]
    WorkerLost,
}

/// Top-level error for the CLI surface.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}
