//! Debounced, cancellable address-autocomplete pipeline.
//!
//! [`Autocomplete`] sits between a text input and the places API: it
//! debounces rapid input changes, loads the places library once per
//! configuration through a shared [`LibraryCache`], correlates a search
//! burst under one session token, and commits results race-safely so a
//! stale response never overwrites fresher state.

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod readiness;

pub use config::{AutocompleteConfig, ConfigError};
pub use coordinator::{Autocomplete, FetchStatus, SelectCallback, Snapshot};
pub use debounce::Debounced;
pub use readiness::ReadinessTracker;

pub use placeflow_places::{LibraryCache, PlacesError, SessionToken, Suggestion};
