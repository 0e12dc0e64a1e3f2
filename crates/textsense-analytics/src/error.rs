use thiserror::Error;

/// Errors returned by [`crate::TextAnalyticsClient`].
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Network, TLS or request-building failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint cannot be turned into a request URL.
    #[error("invalid endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("at least one document is required")]
    EmptyBatch,

    /// The service answered with a non-2xx status (bad key, quota, outage).
    #[error("unexpected HTTP status {status} from sentiment endpoint: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response carried unknown document id \"{0}\"")]
    UnknownDocumentId(String),

    #[error("response carried document id {id} more than once")]
    DuplicateDocument { id: usize },

    #[error("response has no result for document id {id}")]
    MissingDocument { id: usize },
}
