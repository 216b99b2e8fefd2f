//! HTTP client for the places API.
//!
//! Wraps `reqwest` with credential management, canonical URL building, and
//! typed response deserialization. One client serves all three endpoints:
//! the bootstrap capability probe, the suggestion service, and the legacy
//! prediction service.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{BootstrapResponse, PredictResponse, SuggestResponse, SuggestionRequest};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";

const BOOTSTRAP_PATH: &str = "maps/api/bootstrap";
const SUGGEST_PATH: &str = "maps/api/place/autocomplete/suggest";
const PREDICT_PATH: &str = "maps/api/place/autocomplete/predict";

/// Client for the places API.
///
/// Manages the HTTP client, API key, and base URL. Use [`PlacesClient::new`]
/// for production or [`PlacesClient::with_base_url`] to point at a mock
/// server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::Configuration`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("placeflow/0.1 (address-autocomplete)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // set_path replaces the whole path rather than a trailing segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            PlacesError::Configuration(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Probes the upstream capability document.
    ///
    /// Calls the bootstrap endpoint with the fixed `libraries=places`
    /// selector plus the optional language and region hints.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the capability document does not
    ///   match the expected shape.
    pub async fn bootstrap(
        &self,
        language: Option<&str>,
        region: Option<&str>,
    ) -> Result<BootstrapResponse, PlacesError> {
        let mut extra: Vec<(&str, &str)> = vec![("libraries", "places")];
        if let Some(language) = language {
            extra.push(("language", language));
        }
        if let Some(region) = region {
            extra.push(("region", region));
        }

        let url = self.build_url(BOOTSTRAP_PATH, &extra);
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
            context: "bootstrap".to_owned(),
            source: e,
        })
    }

    /// Queries the newer suggestion service.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestResponse, PlacesError> {
        let params = Self::query_params(request);
        let url = self.build_url(SUGGEST_PATH, &borrowed(&params));
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
            context: format!("suggest(input={})", request.input),
            source: e,
        })
    }

    /// Queries the legacy prediction service.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn predict(
        &self,
        request: &SuggestionRequest,
    ) -> Result<PredictResponse, PlacesError> {
        let params = Self::query_params(request);
        let url = self.build_url(PREDICT_PATH, &borrowed(&params));
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
            context: format!("predict(input={})", request.input),
            source: e,
        })
    }

    /// Translates a [`SuggestionRequest`] into wire query parameters shared
    /// by both query endpoints. Country restrictions collapse into one
    /// `components=country:xx|country:yy` parameter.
    fn query_params(request: &SuggestionRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![("input", request.input.clone())];
        if let Some(token) = &request.session_token {
            params.push(("sessiontoken", token.as_str().to_owned()));
        }
        if let Some(language) = &request.language {
            params.push(("language", language.clone()));
        }
        if !request.countries.is_empty() {
            let components = request
                .countries
                .iter()
                .map(|c| format!("country:{}", c.to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            params.push(("components", components));
        }
        params
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters. The credential always comes first.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

fn borrowed<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionToken;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_puts_credential_first() {
        let client = test_client("https://maps.googleapis.com");
        let url = client.build_url(BOOTSTRAP_PATH, &[("libraries", "places")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/bootstrap?key=test-key&libraries=places"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://maps.googleapis.com/");
        let url = client.build_url(SUGGEST_PATH, &[("input", "Par")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/autocomplete/suggest?key=test-key&input=Par"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.googleapis.com");
        let url = client.build_url(SUGGEST_PATH, &[("input", "rue de l'Église & co")]);
        assert!(
            url.as_str().contains("%26"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn query_params_collapse_countries_into_components() {
        let request = SuggestionRequest {
            input: "Par".to_owned(),
            session_token: None,
            language: Some("fr".to_owned()),
            countries: vec!["FR".to_owned(), "BE".to_owned()],
        };
        let params = PlacesClient::query_params(&request);
        assert!(params.contains(&("language", "fr".to_owned())));
        assert!(params.contains(&("components", "country:fr|country:be".to_owned())));
    }

    #[test]
    fn query_params_include_session_token_when_present() {
        let token = SessionToken::new();
        let request = SuggestionRequest {
            input: "Par".to_owned(),
            session_token: Some(token.clone()),
            language: None,
            countries: Vec::new(),
        };
        let params = PlacesClient::query_params(&request);
        assert!(params.contains(&("sessiontoken", token.as_str().to_owned())));
    }
}
