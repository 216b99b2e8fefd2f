//! Normalization of upstream prediction records into the common
//! [`Suggestion`] shape surfaced to callers.
//!
//! Both query variants feed through here. A record lacking a resolvable
//! place id or a derivable description is dropped, never surfaced; drops are
//! logged at `debug` and are not errors.

use serde::Serialize;

use crate::types::{Prediction, SuggestionRecord};

/// A normalized, displayable candidate place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub place_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_formatting: Option<StructuredFormatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_substrings: Option<Vec<MatchedSubstring>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<Term>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchedSubstring {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub offset: usize,
    pub value: String,
}

/// Converts a suggestion-service record into a [`Suggestion`].
///
/// The description is `main · secondary`, keeping whichever parts are
/// present; the main text falls back to the record's flat text. Returns
/// `None` when no place id or no description can be derived.
#[must_use]
pub fn from_suggestion_record(record: &SuggestionRecord) -> Option<Suggestion> {
    let prediction = record.place_prediction.as_ref()?;

    let place_id = prediction.place_id.clone().unwrap_or_default();
    let main_text = prediction
        .structured_format
        .as_ref()
        .and_then(|f| f.main_text.as_ref())
        .and_then(|t| t.text.clone())
        .or_else(|| prediction.text.as_ref().and_then(|t| t.text.clone()));
    let secondary_text = prediction
        .structured_format
        .as_ref()
        .and_then(|f| f.secondary_text.as_ref())
        .and_then(|t| t.text.clone());

    let description = [main_text.as_deref(), secondary_text.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");

    if place_id.is_empty() || description.is_empty() {
        tracing::debug!(?place_id, "dropping suggestion record without place id or description");
        return None;
    }

    Some(Suggestion {
        place_id,
        description: description.clone(),
        structured_formatting: Some(StructuredFormatting {
            main_text: main_text.filter(|t| !t.is_empty()).unwrap_or(description),
            secondary_text,
        }),
        matched_substrings: None,
        terms: None,
        types: None,
    })
}

/// Converts a legacy prediction into a [`Suggestion`].
///
/// Returns `None` when the record has an empty place id or description.
#[must_use]
pub fn from_prediction(prediction: &Prediction) -> Option<Suggestion> {
    if prediction.description.is_empty() || prediction.place_id.is_empty() {
        tracing::debug!(
            place_id = %prediction.place_id,
            "dropping prediction without place id or description"
        );
        return None;
    }

    Some(Suggestion {
        place_id: prediction.place_id.clone(),
        description: prediction.description.clone(),
        structured_formatting: prediction.structured_formatting.as_ref().map(|f| {
            StructuredFormatting {
                main_text: f.main_text.clone(),
                secondary_text: f.secondary_text.clone(),
            }
        }),
        matched_substrings: prediction.matched_substrings.as_ref().map(|matches| {
            matches
                .iter()
                .map(|m| MatchedSubstring {
                    offset: m.offset,
                    length: m.length,
                })
                .collect()
        }),
        terms: prediction.terms.as_ref().map(|terms| {
            terms
                .iter()
                .map(|t| Term {
                    offset: t.offset,
                    value: t.value.clone(),
                })
                .collect()
        }),
        types: prediction.types.clone(),
    })
}
