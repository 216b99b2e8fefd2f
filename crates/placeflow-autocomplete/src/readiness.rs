//! Library readiness signal for one configuration.
//!
//! Ready is synchronously true at construction when the cache already holds
//! a resolved handle for the configuration's fingerprint; otherwise a single
//! load is triggered in the background. Re-reading the signal never
//! re-triggers loading — a changed configuration means a new tracker.

use std::sync::{Arc, Mutex, MutexGuard};

use placeflow_places::{LibraryCache, LoadOptions, PlacesLibrary};

#[derive(Default)]
struct ReadyState {
    ready: bool,
    error: Option<String>,
    library: Option<Arc<PlacesLibrary>>,
}

pub struct ReadinessTracker {
    state: Arc<Mutex<ReadyState>>,
}

impl ReadinessTracker {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(cache: &Arc<LibraryCache>, options: LoadOptions) -> Self {
        if let Some(library) = cache.get_if_ready(&options.fingerprint()) {
            return Self {
                state: Arc::new(Mutex::new(ReadyState {
                    ready: true,
                    error: None,
                    library: Some(library),
                })),
            };
        }

        let state = Arc::new(Mutex::new(ReadyState::default()));
        let task_state = Arc::clone(&state);
        let cache = Arc::clone(cache);
        tokio::spawn(async move {
            match cache.load(&options).await {
                Ok(library) => {
                    let mut st = task_state.lock().expect("readiness lock poisoned");
                    st.ready = true;
                    st.library = Some(library);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "places library failed to load");
                    task_state.lock().expect("readiness lock poisoned").error =
                        Some(e.to_string());
                }
            }
        });

        Self { state }
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.lock().ready
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    #[must_use]
    pub fn library(&self) -> Option<Arc<PlacesLibrary>> {
        self.lock().library.clone()
    }

    /// True once the load attempt has finished, successfully or not.
    #[must_use]
    pub fn settled(&self) -> bool {
        let st = self.lock();
        st.ready || st.error.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, ReadyState> {
        self.state.lock().expect("readiness lock poisoned")
    }
}
