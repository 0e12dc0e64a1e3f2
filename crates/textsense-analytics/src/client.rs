//! HTTP client for the Text Analytics sentiment endpoint.
//!
//! Wraps `reqwest` with endpoint handling, subscription-key auth and typed
//! response deserialization. The endpoint is validated per call rather than
//! at construction, so a client built from placeholder configuration still
//! exists and fails each request instead of failing startup.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::AnalyticsError;
use crate::merge::merge_in_input_order;
use crate::types::{DocumentResult, MultiLanguageInput, SentimentRequest, SentimentResponse};

const SENTIMENT_PATH: &str = "text/analytics/v3.1/sentiment";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const DEFAULT_LANGUAGE: &str = "en";

/// Client for the sentiment endpoint.
///
/// Holds a pooled `reqwest::Client` plus immutable credentials; share it
/// behind an `Arc` across concurrent requests.
pub struct TextAnalyticsClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl TextAnalyticsClient {
    /// Creates a client for `endpoint` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Result<Self, AnalyticsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("textsense/0.1 (sentiment-adapter)")
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            api_key: api_key.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
        })
    }

    /// Overrides the language hint sent with every document.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        language.clone_into(&mut self.language);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Analyzes each document and returns one result per input, in input order.
    ///
    /// A document the service could not analyze yields
    /// [`DocumentResult::Error`]; that is not a failure of the call.
    ///
    /// # Errors
    ///
    /// - [`AnalyticsError::EmptyBatch`] if `documents` is empty.
    /// - [`AnalyticsError::InvalidEndpoint`] if the endpoint is not an http(s) URL.
    /// - [`AnalyticsError::Http`] on network failure.
    /// - [`AnalyticsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AnalyticsError::Deserialize`], [`AnalyticsError::UnknownDocumentId`],
    ///   [`AnalyticsError::DuplicateDocument`] or [`AnalyticsError::MissingDocument`]
    ///   if the response does not match the submitted batch.
    pub async fn analyze_sentiment<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<Vec<DocumentResult>, AnalyticsError> {
        if documents.is_empty() {
            return Err(AnalyticsError::EmptyBatch);
        }

        let url = self.sentiment_url()?;
        let request = SentimentRequest {
            documents: documents
                .iter()
                .enumerate()
                .map(|(i, text)| MultiLanguageInput {
                    id: i.to_string(),
                    language: &self.language,
                    text: text.as_ref(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: SentimentResponse =
            serde_json::from_str(&body).map_err(|e| AnalyticsError::Deserialize {
                context: "sentiment response".to_string(),
                source: e,
            })?;

        tracing::debug!(
            model_version = parsed.model_version.as_deref().unwrap_or("unknown"),
            documents = parsed.documents.len(),
            errors = parsed.errors.len(),
            "sentiment response received"
        );

        merge_in_input_order(documents.len(), parsed.documents, parsed.errors)
    }

    /// Builds `{endpoint}/text/analytics/v3.1/sentiment?stringIndexType=UnicodeCodePoint`.
    ///
    /// Any path already on the endpoint is kept; trailing slashes are collapsed
    /// so the sentiment path is appended rather than replacing a segment.
    fn sentiment_url(&self) -> Result<Url, AnalyticsError> {
        let invalid = |reason: String| AnalyticsError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };

        let base = self.endpoint.trim().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{SENTIMENT_PATH}"))
            .map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        url.query_pairs_mut()
            .append_pair("stringIndexType", "UnicodeCodePoint");
        Ok(url)
    }
}
