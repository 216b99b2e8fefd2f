use thiserror::Error;

/// Errors returned by the places client, loader, and query providers.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// The places library is unavailable and the configuration cannot load it
    /// (no credential). Fatal to that configuration; never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The bootstrap load failed, or the places library was still missing
    /// after a successful load. Surfaced once per configuration.
    #[error("load error: {0}")]
    Load(String),

    /// The upstream query returned a status outside the accepted set.
    #[error("{0}")]
    Status(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
