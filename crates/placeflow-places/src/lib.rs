pub mod client;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod provider;
pub mod session;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use loader::{ApiVariant, LibraryCache, LoadOptions, LoaderKey, PlacesLibrary};
pub use normalize::{MatchedSubstring, StructuredFormatting, Suggestion, Term};
pub use provider::{LegacyPredictService, SuggestService, SuggestionProvider};
pub use session::SessionToken;
pub use types::SuggestionRequest;
