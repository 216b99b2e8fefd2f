//! The suggestion fetch coordinator.
//!
//! Owns the request lifecycle: input validation, session-token lifecycle,
//! provider dispatch, race-safe state commit, and error classification.
//! State transitions: `Idle → Loading → {Success, Error}`, and any state
//! back to `Idle` when the input becomes too short.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use placeflow_places::{LibraryCache, SessionToken, Suggestion, SuggestionRequest};

use crate::config::AutocompleteConfig;
use crate::debounce::Debounced;
use crate::readiness::ReadinessTracker;

/// The single authoritative fetch state of one coordinator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Caller-supplied selection callback, invoked synchronously from
/// [`Autocomplete::select`].
pub type SelectCallback = dyn Fn(&Suggestion) + Send + Sync;

/// Point-in-time view of the coordinator surface.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub suggestions: Vec<Suggestion>,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub loading: bool,
    pub ready: bool,
}

struct FetchState {
    suggestions: Vec<Suggestion>,
    status: FetchStatus,
    error: Option<String>,
    session_token: Option<SessionToken>,
}

struct Inner {
    config: AutocompleteConfig,
    readiness: ReadinessTracker,
    state: Mutex<FetchState>,
    /// Cleared synchronously at shutdown; checked immediately before any
    /// state commit so a response arriving afterwards is discarded.
    live: AtomicBool,
    /// Bumped per dispatched fetch; a fetch superseded by a newer one loses
    /// the comparison and discards its result.
    generation: AtomicU64,
    on_select: Option<Box<SelectCallback>>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().expect("coordinator lock poisoned")
    }

    fn ensure_session_token(&self) -> SessionToken {
        self.state()
            .session_token
            .get_or_insert_with(SessionToken::new)
            .clone()
    }

    async fn fetch(&self, raw: &str) {
        let input = raw.trim();

        if input.is_empty() || input.chars().count() < self.config.min_length {
            let mut st = self.state();
            st.suggestions.clear();
            st.status = FetchStatus::Idle;
            st.error = None;
            return;
        }

        if !self.readiness.settled() {
            // Transient pre-load state, not a failure.
            self.state().status = FetchStatus::Idle;
            return;
        }

        let Some(library) = self.readiness.library() else {
            let mut st = self.state();
            st.status = FetchStatus::Error;
            st.error = Some(
                self.readiness
                    .error()
                    .unwrap_or_else(|| "places library is not available".to_owned()),
            );
            return;
        };

        let session_token = self.ensure_session_token();
        {
            let mut st = self.state();
            st.status = FetchStatus::Loading;
            st.error = None;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = SuggestionRequest {
            input: input.to_owned(),
            session_token: Some(session_token),
            language: self.config.language.clone(),
            countries: self.config.countries.clone(),
        };

        let result = library.provider().query(&request).await;

        // Liveness and supersession are checked immediately before the
        // commit; a stale response can never overwrite newer state.
        if !self.live.load(Ordering::SeqCst)
            || self.generation.load(Ordering::SeqCst) != generation
        {
            tracing::debug!(input, "discarding superseded fetch result");
            return;
        }

        let mut st = self.state();
        match result {
            Ok(suggestions) => {
                st.suggestions = suggestions;
                st.status = FetchStatus::Success;
            }
            Err(e) => {
                st.error = Some(e.to_string());
                st.status = FetchStatus::Error;
            }
        }
    }
}

/// Debounced, cancellable autocomplete pipeline over the places API.
///
/// Dropping (or calling [`Autocomplete::shutdown`] on) an instance clears
/// its liveness flag and cancels any pending debounced fetch; an in-flight
/// request is not aborted, but its result is discarded on arrival.
pub struct Autocomplete {
    inner: Arc<Inner>,
    debounced: Debounced<String>,
}

impl Autocomplete {
    /// Creates a coordinator and starts loading the places library through
    /// `cache` unless a handle for this configuration is already resolved.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        config: AutocompleteConfig,
        cache: &Arc<LibraryCache>,
        on_select: Option<Box<SelectCallback>>,
    ) -> Self {
        let readiness = ReadinessTracker::new(cache, config.load_options());
        let debounce = std::time::Duration::from_millis(config.debounce_ms);

        let inner = Arc::new(Inner {
            config,
            readiness,
            state: Mutex::new(FetchState {
                suggestions: Vec::new(),
                status: FetchStatus::Idle,
                error: None,
                session_token: None,
            }),
            live: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            on_select,
        });

        let fetch_inner = Arc::clone(&inner);
        let debounced = Debounced::new(debounce, move |raw: String| {
            let inner = Arc::clone(&fetch_inner);
            async move {
                inner.fetch(&raw).await;
            }
        });

        Self { inner, debounced }
    }

    /// Feeds an input change through the debounce window.
    pub fn input(&self, raw: &str) {
        self.debounced.call(raw.to_owned());
    }

    /// Runs one fetch immediately, bypassing the debounce window.
    pub async fn fetch_now(&self, raw: &str) {
        self.inner.fetch(raw).await;
    }

    /// Finalizes a chosen suggestion: invokes the selection callback
    /// synchronously, optionally clears the suggestion list, and always
    /// invalidates the session token so the next burst starts a new session.
    pub fn select(&self, suggestion: &Suggestion) {
        if let Some(on_select) = &self.inner.on_select {
            on_select(suggestion);
        }
        let mut st = self.inner.state();
        if self.inner.config.auto_clear_on_select {
            st.suggestions.clear();
        }
        st.session_token = None;
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.inner.readiness.ready()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let st = self.inner.state();
        Snapshot {
            suggestions: st.suggestions.clone(),
            status: st.status,
            error: st.error.clone(),
            loading: st.status == FetchStatus::Loading,
            ready: self.inner.readiness.ready(),
        }
    }

    /// Tears the coordinator down: clears the liveness flag synchronously
    /// and cancels any pending debounced fetch.
    pub fn shutdown(&self) {
        self.inner.live.store(false, Ordering::SeqCst);
        self.debounced.cancel();
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.shutdown();
    }
}
