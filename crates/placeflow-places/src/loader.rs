//! Keyed, idempotent loading of the places library.
//!
//! [`LibraryCache`] is the explicit, constructor-injected replacement for a
//! process-global load map: create one at the application root and hand it
//! by reference to every coordinator. Loads are keyed by configuration
//! fingerprint and share a single in-flight future, so concurrent callers
//! under one configuration trigger exactly one physical load for the cache
//! lifetime. Entries are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;

use crate::client::{PlacesClient, DEFAULT_BASE_URL};
use crate::error::PlacesError;
use crate::provider::{LegacyPredictService, SuggestService, SuggestionProvider};

/// Which upstream query variant a loaded library dispatches through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVariant {
    Suggest,
    LegacyPredict,
}

/// Parameters that shape one load attempt; their fingerprint is the cache key.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            language: None,
            region: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 30,
        }
    }
}

impl LoadOptions {
    /// Canonical configuration fingerprint. Two option sets with the same
    /// fingerprint share one cache entry and one physical load.
    #[must_use]
    pub fn fingerprint(&self) -> LoaderKey {
        LoaderKey(format!(
            "{}|key={}|libraries=places|language={}|region={}",
            self.base_url.trim_end_matches('/'),
            self.api_key.as_deref().unwrap_or(""),
            self.language.as_deref().unwrap_or(""),
            self.region.as_deref().unwrap_or(""),
        ))
    }
}

/// Opaque cache key derived from [`LoadOptions::fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoaderKey(String);

/// A loaded library handle: the query provider selected at construction time
/// by capability probing.
pub struct PlacesLibrary {
    variant: ApiVariant,
    provider: Box<dyn SuggestionProvider>,
}

impl std::fmt::Debug for PlacesLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesLibrary")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl PlacesLibrary {
    #[must_use]
    pub fn new(client: PlacesClient, variant: ApiVariant) -> Self {
        let client = Arc::new(client);
        let provider: Box<dyn SuggestionProvider> = match variant {
            ApiVariant::Suggest => Box::new(SuggestService::new(client)),
            ApiVariant::LegacyPredict => Box::new(LegacyPredictService::new(client)),
        };
        Self { variant, provider }
    }

    #[must_use]
    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    #[must_use]
    pub fn provider(&self) -> &dyn SuggestionProvider {
        self.provider.as_ref()
    }
}

type LoadResult = Result<Arc<PlacesLibrary>, String>;
type LoadFuture = Shared<BoxFuture<'static, LoadResult>>;

/// Process-lifetime cache of library handles, keyed by configuration
/// fingerprint.
#[derive(Default)]
pub struct LibraryCache {
    entries: Mutex<HashMap<LoaderKey, LoadFuture>>,
}

impl LibraryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with an already-constructed library for hosts that
    /// build the handle out of band. Subsequent loads under the same
    /// fingerprint resolve immediately with no network action.
    pub fn preload(&self, options: &LoadOptions, library: Arc<PlacesLibrary>) {
        let ready: LoadFuture = futures::future::ready(Ok(library)).boxed().shared();
        self.entries().insert(options.fingerprint(), ready);
    }

    /// Returns the resolved library for `key` without triggering a load, or
    /// `None` if no load has completed successfully.
    #[must_use]
    pub fn get_if_ready(&self, key: &LoaderKey) -> Option<Arc<PlacesLibrary>> {
        self.entries()
            .get(key)
            .and_then(|future| future.peek())
            .and_then(|result| result.as_ref().ok().cloned())
    }

    /// Loads (or joins the in-flight load of) the library for `options`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Configuration`] if the library is not cached and no
    ///   credential is configured. This check happens before anything is
    ///   cached, so supplying a credential later still works.
    /// - [`PlacesError::Load`] if the bootstrap request fails or the places
    ///   library is missing from the capability document. Failed loads stay
    ///   cached; a retry requires a configuration change, matching the
    ///   surfaced-once policy.
    pub async fn load(&self, options: &LoadOptions) -> Result<Arc<PlacesLibrary>, PlacesError> {
        let key = options.fingerprint();

        let future = {
            let mut entries = self.entries();
            if let Some(existing) = entries.get(&key) {
                existing.clone()
            } else {
                let Some(api_key) = options.api_key.clone() else {
                    return Err(PlacesError::Configuration(
                        "places library is not available and no api_key was provided".to_owned(),
                    ));
                };
                let future: LoadFuture =
                    Self::perform_load(options.clone(), api_key).boxed().shared();
                entries.insert(key, future.clone());
                future
            }
        };

        future.await.map_err(PlacesError::Load)
    }

    /// One physical load: construct the client, probe capabilities, verify
    /// the places library is present, and pick the query variant (the newer
    /// suggestion service wins when advertised).
    async fn perform_load(options: LoadOptions, api_key: String) -> LoadResult {
        let client = PlacesClient::with_base_url(&api_key, options.timeout_secs, &options.base_url)
            .map_err(|e| format!("failed to construct places client: {e}"))?;

        let capabilities = client
            .bootstrap(options.language.as_deref(), options.region.as_deref())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "places bootstrap load failed");
                format!("failed to load places bootstrap: {e}")
            })?;

        if !capabilities.libraries.iter().any(|lib| lib == "places") {
            return Err("bootstrap loaded but the places library is unavailable".to_owned());
        }

        let variant = if capabilities.services.suggest {
            ApiVariant::Suggest
        } else {
            ApiVariant::LegacyPredict
        };
        tracing::debug!(?variant, "places library loaded");

        Ok(Arc::new(PlacesLibrary::new(client, variant)))
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<LoaderKey, LoadFuture>> {
        self.entries.lock().expect("library cache lock poisoned")
    }
}
