//! Error type shared by every entropy stream.
//!
//! There are exactly two failure modes: the platform resource could not be
//! acquired, or a read from it failed. Neither is recoverable locally.

use std::io;
use thiserror::Error;

/// Errors produced by entropy sources and the hash mixer.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The platform random resource could not be opened or configured.
    #[error("entropy source unavailable: {resource}: {source}")]
    ResourceUnavailable {
        /// Device path or provider name that was requested.
        resource: String,
        #[source]
        source: io::Error,
    },
    /// A read returned an error or fewer bytes than requested.
    #[error("entropy read of {requested} bytes failed: {source}")]
    ReadFailure {
        /// Bytes the failing platform call was asked for.
        requested: usize,
        #[source]
        source: io::Error,
    },
}

impl EntropyError {
    pub(crate) fn unavailable(resource: impl Into<String>, source: io::Error) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            source,
        }
    }

    pub(crate) fn read(requested: usize, source: io::Error) -> Self {
        Self::ReadFailure { requested, source }
    }

    /// Returns the raw platform error code, if the failure carried one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::ResourceUnavailable { source, .. } | Self::ReadFailure { source, .. } => {
                source.raw_os_error()
            }
        }
    }

    /// Returns true for construction-time failures.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }
}

impl From<EntropyError> for rand_core::Error {
    fn from(err: EntropyError) -> Self {
        rand_core::Error::new(err)
    }
}
