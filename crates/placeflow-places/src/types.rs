//! Wire types for the places API.
//!
//! Two query endpoints coexist upstream: the newer suggestion service
//! (camelCase bodies, nested text parts, optional status) and the legacy
//! prediction service (snake_case bodies, mandatory status). Both are
//! modelled here exactly as they appear on the wire; [`crate::normalize`]
//! converts them into the common [`crate::Suggestion`] shape.

use serde::Deserialize;

use crate::session::SessionToken;

/// Statuses treated as success by both query variants. `ZERO_RESULTS` is a
/// valid empty answer, not a failure.
pub const ACCEPTED_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// Returns `true` if `status` is in the accepted set.
#[must_use]
pub fn status_accepted(status: &str) -> bool {
    ACCEPTED_STATUSES.contains(&status)
}

/// A single query against either upstream variant.
#[derive(Debug, Clone, Default)]
pub struct SuggestionRequest {
    pub input: String,
    pub session_token: Option<SessionToken>,
    pub language: Option<String>,
    /// ISO 3166-1 alpha-2 codes; restricts results to these countries.
    pub countries: Vec<String>,
}

// ---------------------------------------------------------------------------
// bootstrap
// ---------------------------------------------------------------------------

/// Capability document returned by the bootstrap endpoint.
///
/// `libraries` lists the loaded sub-libraries; the load is only considered
/// successful when `"places"` is present. `services` advertises which query
/// variants the upstream exposes.
#[derive(Debug, Deserialize)]
pub struct BootstrapResponse {
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub services: ServiceFlags,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFlags {
    #[serde(default)]
    pub suggest: bool,
    #[serde(default)]
    pub legacy_predict: bool,
}

// ---------------------------------------------------------------------------
// suggest (new API)
// ---------------------------------------------------------------------------

/// Response from the suggestion service.
///
/// `status` is absent on the promise-shaped success path and present on the
/// callback-shaped path; when present and outside [`ACCEPTED_STATUSES`] the
/// whole response is rejected. Some deployments return raw `predictions`
/// alongside `suggestions`; both are normalized, suggestions first.
#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<SuggestionRecord>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    #[serde(default)]
    pub place_prediction: Option<PlacePrediction>,
    #[serde(default)]
    pub distance_meters: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePrediction {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub text: Option<TextPart>,
    #[serde(default)]
    pub structured_format: Option<StructuredFormat>,
}

/// A localized text fragment; the service nests plain strings one level deep.
#[derive(Debug, Deserialize)]
pub struct TextPart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredFormat {
    #[serde(default)]
    pub main_text: Option<TextPart>,
    #[serde(default)]
    pub secondary_text: Option<TextPart>,
}

// ---------------------------------------------------------------------------
// predict (legacy API)
// ---------------------------------------------------------------------------

/// Response from the legacy prediction service. `status` is always present.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    pub status: String,
}

/// A legacy prediction record (snake_case wire format).
#[derive(Debug, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub structured_formatting: Option<WireStructuredFormatting>,
    #[serde(default)]
    pub matched_substrings: Option<Vec<WireMatchedSubstring>>,
    #[serde(default)]
    pub terms: Option<Vec<WireTerm>>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct WireStructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireMatchedSubstring {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Deserialize)]
pub struct WireTerm {
    pub offset: usize,
    pub value: String,
}
