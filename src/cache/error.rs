use thiserror::Error;

/// Boxed error type returned by data sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`Getter`](super::Getter) while resolving a miss.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data source has no value for the key.
    #[error("{key} not exists")]
    NotFound { key: String },

    /// The data source itself failed.
    #[error(transparent)]
    Upstream(#[from] BoxError),
}

impl LoadError {
    /// Shorthand for [`LoadError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}

/// Errors produced by the caching layer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The lookup key was empty.
    #[error("key is required")]
    EmptyKey,

    /// No group is registered under `name`.
    #[error("no such group: {name}")]
    NoSuchGroup { name: String },

    /// A group was constructed without a data source.
    #[error("group {name:?} requires a getter")]
    MissingGetter { name: String },

    /// Propagated unchanged from the data source.
    #[error(transparent)]
    Load(#[from] LoadError),
}
