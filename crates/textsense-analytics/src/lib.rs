//! Client for the Azure Text Analytics sentiment endpoint.
//!
//! Sends a batch of plain-text documents, then hands back one
//! [`DocumentResult`] per input document in input order. Per-document
//! service errors are values, not `Err`s; only transport and
//! response-shape failures surface as [`AnalyticsError`].

pub mod client;
pub mod error;
pub mod types;

mod merge;

pub use client::TextAnalyticsClient;
pub use error::AnalyticsError;
pub use types::{
    ConfidenceScores, DocumentError, DocumentResult, DocumentSentiment, SentenceSentiment,
    Sentiment, ServiceError,
};
