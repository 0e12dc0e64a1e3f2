use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use textsense_analytics::{ConfidenceScores, DocumentResult, Sentiment};

use crate::middleware::RequestId;

use super::{map_analytics_error, ApiError, AppState};

const SEND_TEXT_FIELD: &str = "sendText";

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeSentimentForm {
    #[serde(rename = "sendText")]
    pub send_text: String,
}

/// The required, non-empty `sendText` field from either a urlencoded or a
/// `multipart/form-data` body. Any other content type is rejected with 415.
#[derive(Debug)]
pub(super) struct SendText(pub String);

impl<S> FromRequest<S> for SendText
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| {
                ct.trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            });

        let text = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
            read_send_text_field(multipart).await?
        } else {
            let Form(form) = Form::<AnalyzeSentimentForm>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::from_form_rejection(&rejection))?;
            form.send_text
        };

        // An empty value counts as a missing required field.
        if text.is_empty() {
            return Err(missing_send_text());
        }
        Ok(Self(text))
    }
}

async fn read_send_text_field(mut multipart: Multipart) -> Result<String, ApiError> {
    let multipart_error =
        |e: axum::extract::multipart::MultipartError| ApiError::new(e.status(), e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(SEND_TEXT_FIELD) {
            return field.text().await.map_err(multipart_error);
        }
    }
    Err(missing_send_text())
}

fn missing_send_text() -> ApiError {
    ApiError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Field required: {SEND_TEXT_FIELD}"),
    )
}

#[derive(Debug, Serialize)]
pub(super) struct SentimentResponse {
    pub results: Vec<DocumentOutcome>,
}

/// One entry of `results`, positioned like its input document.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum DocumentOutcome {
    Sentiment(DocumentSentimentItem),
    Error(DocumentErrorItem),
}

#[derive(Debug, Serialize)]
pub(super) struct DocumentSentimentItem {
    pub document_text: String,
    pub overall_sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
    pub sentences: Vec<SentenceSentimentItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct SentenceSentimentItem {
    pub sentence_text: String,
    pub sentence_sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
}

#[derive(Debug, Serialize)]
pub(super) struct DocumentErrorItem {
    pub error: String,
}

pub(super) async fn analyze_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    SendText(text): SendText,
) -> Result<Json<SentimentResponse>, ApiError> {
    let documents = [text];

    tracing::info!(
        request_id = %req_id.0,
        documents = documents.len(),
        "analyze sentiment"
    );

    let results = state
        .analytics
        .analyze_sentiment(&documents)
        .await
        .map_err(|e| map_analytics_error(&req_id.0, &e))?;

    Ok(Json(SentimentResponse {
        results: build_outcomes(documents, results),
    }))
}

/// Pairs each submitted text with its result. The service does not echo the
/// input, so the original text is copied back into successful entries.
pub(super) fn build_outcomes<I>(documents: I, results: Vec<DocumentResult>) -> Vec<DocumentOutcome>
where
    I: IntoIterator<Item = String>,
{
    documents
        .into_iter()
        .zip(results)
        .map(|(document_text, result)| match result {
            DocumentResult::Sentiment(doc) => DocumentOutcome::Sentiment(DocumentSentimentItem {
                document_text,
                overall_sentiment: doc.sentiment,
                confidence_scores: doc.confidence_scores,
                sentences: doc
                    .sentences
                    .into_iter()
                    .map(|sentence| SentenceSentimentItem {
                        sentence_text: sentence.text,
                        sentence_sentiment: sentence.sentiment,
                        confidence_scores: sentence.confidence_scores,
                    })
                    .collect(),
            }),
            DocumentResult::Error(err) => DocumentOutcome::Error(DocumentErrorItem {
                error: err.error.to_string(),
            }),
        })
        .collect()
}
