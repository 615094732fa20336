//! Hash mixing of OS entropy.
//!
//! A [`HashMixer`] pulls `F * D` bytes of raw entropy for every `D`-byte
//! output segment, where `D` is the digest length and `F` the stretch factor,
//! and emits the digest of each pull. Segments never share source material.

mod mixer;
mod stretch;

pub use mixer::HashMixer;
pub use stretch::StretchFactor;

use crate::source::OsEntropySource;

/// SHA-1 mixer over the platform source: 20-byte segments.
pub type Sha1Mixer<S = OsEntropySource> = HashMixer<sha1::Sha1, S>;

/// SHA-256 mixer over the platform source: 32-byte segments.
pub type Sha256Mixer<S = OsEntropySource> = HashMixer<sha2::Sha256, S>;

/// BLAKE3 mixer over the platform source: 32-byte segments.
pub type Blake3Mixer<S = OsEntropySource> = HashMixer<blake3::Hasher, S>;
