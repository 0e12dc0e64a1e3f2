//! Reassembles the service's split `documents`/`errors` lists into input order.

use crate::error::AnalyticsError;
use crate::types::{DocumentError, DocumentResult, DocumentSentiment};

/// Places every result at the position encoded in its id.
///
/// Ids are the zero-based input positions the client assigned when building
/// the request. Every position must be filled exactly once.
pub(crate) fn merge_in_input_order(
    expected: usize,
    documents: Vec<DocumentSentiment>,
    errors: Vec<DocumentError>,
) -> Result<Vec<DocumentResult>, AnalyticsError> {
    let mut slots: Vec<Option<DocumentResult>> = vec![None; expected];

    let tagged = documents
        .into_iter()
        .map(|d| (d.id.clone(), DocumentResult::Sentiment(d)))
        .chain(
            errors
                .into_iter()
                .map(|e| (e.id.clone(), DocumentResult::Error(e))),
        );

    for (raw_id, result) in tagged {
        let index = raw_id
            .parse::<usize>()
            .ok()
            .filter(|i| *i < expected)
            .ok_or_else(|| AnalyticsError::UnknownDocumentId(raw_id.clone()))?;

        let slot = &mut slots[index];
        if slot.is_some() {
            return Err(AnalyticsError::DuplicateDocument { id: index });
        }
        *slot = Some(result);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(id, slot)| slot.ok_or(AnalyticsError::MissingDocument { id }))
        .collect()
}
