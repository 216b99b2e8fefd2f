//! Query providers for the two upstream API variants.
//!
//! The variant split is resolved once, at library construction, by
//! capability probing; the coordinator only ever sees the
//! [`SuggestionProvider`] trait. Both providers share one [`PlacesClient`]
//! and both apply the same accepted-status rule and normalization drops.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::normalize::{self, Suggestion};
use crate::types::{status_accepted, SuggestionRequest};

/// A single asynchronous query contract over both upstream variants.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Runs one query and returns normalized suggestions.
    async fn query(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, PlacesError>;
}

/// Provider for the newer suggestion service.
pub struct SuggestService {
    client: Arc<PlacesClient>,
}

impl SuggestService {
    #[must_use]
    pub fn new(client: Arc<PlacesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SuggestionProvider for SuggestService {
    /// A response with no status field is the promise-shaped success path; a
    /// present status outside the accepted set rejects the whole response.
    /// Normalized suggestions come before normalized raw predictions, each
    /// source keeping its internal order.
    async fn query(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, PlacesError> {
        let response = self.client.suggest(request).await?;

        if let Some(status) = &response.status {
            if !status_accepted(status) {
                return Err(PlacesError::Status(format!(
                    "autocomplete suggestion failed with status {status}"
                )));
            }
        }

        let mut suggestions: Vec<Suggestion> = response
            .suggestions
            .iter()
            .filter_map(normalize::from_suggestion_record)
            .collect();
        suggestions.extend(response.predictions.iter().filter_map(normalize::from_prediction));
        Ok(suggestions)
    }
}

/// Provider for the legacy prediction service.
pub struct LegacyPredictService {
    client: Arc<PlacesClient>,
}

impl LegacyPredictService {
    #[must_use]
    pub fn new(client: Arc<PlacesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SuggestionProvider for LegacyPredictService {
    async fn query(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, PlacesError> {
        let response = self.client.predict(request).await?;

        if !status_accepted(&response.status) {
            return Err(PlacesError::Status(format!(
                "autocomplete prediction failed with status {}",
                response.status
            )));
        }

        Ok(response
            .predictions
            .iter()
            .filter_map(normalize::from_prediction)
            .collect())
    }
}
