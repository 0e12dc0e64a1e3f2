//! Sentiment API request and response types.
//!
//! The response types deserialize straight from the service's camelCase JSON
//! and double as the crate's public result model.

use serde::{Deserialize, Serialize};

/// Sentiment label assigned by the service.
///
/// Documents may be `mixed`; sentences are only ever positive, neutral or
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability-like scores attached to a label. Each is in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceSentiment {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
}

/// Successful analysis of one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSentiment {
    pub id: String,
    pub sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
    #[serde(default)]
    pub sentences: Vec<SentenceSentiment>,
}

/// Error object as the service reports it. `innererror` nests arbitrarily
/// deep; the innermost entry carries the most specific code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub innererror: Option<Box<ServiceError>>,
}

impl ServiceError {
    /// Follows the `innererror` chain to its end.
    #[must_use]
    pub fn innermost(&self) -> &ServiceError {
        let mut current = self;
        while let Some(inner) = current.innererror.as_deref() {
            current = inner;
        }
        current
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.innermost();
        write!(f, "{}: {}", inner.code, inner.message)
    }
}

/// The service could not analyze one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentError {
    pub id: String,
    pub error: ServiceError,
}

/// Outcome for one submitted document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentResult {
    Sentiment(DocumentSentiment),
    Error(DocumentError),
}

impl DocumentResult {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, DocumentResult::Error(_))
    }
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct SentimentRequest<'a> {
    pub documents: Vec<MultiLanguageInput<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MultiLanguageInput<'a> {
    pub id: String,
    pub language: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SentimentResponse {
    pub documents: Vec<DocumentSentiment>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
    #[serde(default)]
    pub model_version: Option<String>,
}
