//! Entropy Stream Library
//!
//! Cryptographically secure random byte streams backed by the operating
//! system. Two streams are provided:
//!
//! - [`OsEntropySource`]: raw bytes from the platform secure random
//!   resource (`/dev/urandom` on unix, a CryptoAPI provider on windows).
//! - [`HashMixer`]: hashes fixed-size pulls of OS entropy and emits the
//!   digests, so every output segment comes from fresh, unshared input.
//!
//! # Architecture
//!
//! ```text
//! caller → HashMixer → OsEntropySource → platform API
//! ```
//!
//! # Design Principles
//!
//! - **Fail-closed**: every read error surfaces to the caller; there is no
//!   retry and no fallback source
//! - **Exclusive ownership**: each stream owns its OS handle and releases it
//!   exactly once on drop
//! - **No caching**: each read consumes fresh entropy
//!
//! # Example
//!
//! ```no_run
//! use entropy_stream::{RandomStream, Sha1Mixer, StretchFactor};
//!
//! let mut mixer = Sha1Mixer::open_with_stretch(StretchFactor::DEFAULT).unwrap();
//!
//! let mut key = [0u8; 45];
//! mixer.read(&mut key).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod mixing;
pub mod source;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig, HashAlgorithm, OutputFormat};
pub use error::EntropyError;
pub use mixing::{Blake3Mixer, HashMixer, Sha1Mixer, Sha256Mixer, StretchFactor};
pub use source::{OsEntropySource, RandomStream};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
