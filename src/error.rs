use thiserror::Error;

/// Result type alias for fallible map, set and iterator operations.
pub type Result<T, K> = core::result::Result<T, Error<K>>;

/// Errors raised by the failing variants of the container operations.
///
/// Lookups that may legitimately miss have two flavors: the `Option`/`bool`
/// returning ones never fail, while the `try_*` ones surface a missing key as
/// [`Error::KeyNotFound`] carrying that key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<K> {
    /// The requested key is not present in the container.
    #[error("key not found: {0:?}")]
    KeyNotFound(K),

    /// The operation is not valid in the current state, e.g. advancing an
    /// exhausted entry iterator.
    #[error("invalid operation")]
    InvalidOperation,
}

impl<K> Error<K> {
    /// Returns the missing key carried by a [`Error::KeyNotFound`].
    pub fn key(&self) -> Option<&K> {
        match self {
            Error::KeyNotFound(key) => Some(key),
            Error::InvalidOperation => None,
        }
    }
}
