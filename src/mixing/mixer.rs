//! Hash mixer over an owned entropy source.
//!
//! # Mixing Model
//!
//! For a hash with digest length `D` and stretch factor `F`, every call to
//! [`RandomStream::read`] runs:
//!
//! ```text
//! for each D-byte slice of the output (last one may be short):
//!     chunk  = source.read(F * D bytes)
//!     digest = H(chunk)
//!     slice  = digest[..slice.len()]
//! ```
//!
//! Unused digest bytes of a short final slice are discarded, never carried
//! into a later call. Nothing is cached between calls.

use super::StretchFactor;
use crate::error::EntropyError;
use crate::source::{fill_or_panic, OsEntropySource, RandomStream};
use rand_core::{CryptoRng, RngCore};
use sha2::Digest;
use std::marker::PhantomData;
use zeroize::{Zeroize, Zeroizing};

/// Random stream that hashes fixed-size pulls of source entropy.
///
/// Generic over the hash `H` so the digest length is a property of the type,
/// and over the source `S`, which the mixer owns exclusively.
pub struct HashMixer<H, S = OsEntropySource> {
    source: S,
    stretch: StretchFactor,
    _hash: PhantomData<fn() -> H>,
}

impl<H: Digest> HashMixer<H, OsEntropySource> {
    /// Opens the platform source and wraps it with the default stretch factor.
    pub fn open() -> Result<Self, EntropyError> {
        Ok(Self::new(OsEntropySource::open()?))
    }

    /// Opens the platform source and wraps it with the given stretch factor.
    pub fn open_with_stretch(stretch: StretchFactor) -> Result<Self, EntropyError> {
        Ok(Self::with_stretch(OsEntropySource::open()?, stretch))
    }
}

impl<H: Digest, S: RandomStream> HashMixer<H, S> {
    /// Wraps `source` with the default stretch factor.
    pub fn new(source: S) -> Self {
        Self::with_stretch(source, StretchFactor::default())
    }

    /// Wraps `source` with an explicit stretch factor.
    pub fn with_stretch(source: S, stretch: StretchFactor) -> Self {
        tracing::debug!(
            digest_len = Self::digest_len(),
            stretch = stretch.get(),
            "Hash mixer created"
        );

        Self {
            source,
            stretch,
            _hash: PhantomData,
        }
    }

    /// Digest length `D` of the hash, in bytes.
    #[inline]
    pub fn digest_len() -> usize {
        <H as Digest>::output_size()
    }

    /// Raw entropy pulled per output segment, `F * D` bytes.
    ///
    /// `F` is capped at [`StretchFactor::MAX`], so this cannot overflow for a
    /// fixed-output digest.
    #[inline]
    pub fn chunk_len(&self) -> usize {
        self.stretch.get() * Self::digest_len()
    }

    /// The stretch factor fixed at construction.
    #[inline]
    pub fn stretch(&self) -> StretchFactor {
        self.stretch
    }

    /// Returns a reference to the owned source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the mixer and returns the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<H: Digest, S: RandomStream> RandomStream for HashMixer<H, S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        if buf.is_empty() {
            return Ok(0);
        }

        let digest_len = Self::digest_len();
        let mut chunk = Zeroizing::new(vec![0u8; self.chunk_len()]);
        let mut filled = 0;
        let mut segments = 0usize;

        while filled < buf.len() {
            let take = digest_len.min(buf.len() - filled);

            if let Err(err) = self.source.read(chunk.as_mut_slice()) {
                // Nothing written so far may be mistaken for output.
                buf.zeroize();
                return Err(err);
            }

            let mut digest = H::digest(chunk.as_slice());
            buf[filled..filled + take].copy_from_slice(&digest[..take]);
            digest.as_mut_slice().zeroize();

            filled += take;
            segments += 1;
        }

        tracing::trace!(
            bytes = buf.len(),
            segments,
            chunk_len = chunk.len(),
            "Mixed entropy"
        );

        Ok(buf.len())
    }
}

impl<H: Digest, S: RandomStream> RngCore for HashMixer<H, S> {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        fill_or_panic(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        RandomStream::read(self, dest)?;
        Ok(())
    }
}

impl<H: Digest, S: RandomStream + CryptoRng> CryptoRng for HashMixer<H, S> {}

impl<H: Digest, S: std::fmt::Debug> std::fmt::Debug for HashMixer<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashMixer")
            .field("digest_len", &<H as Digest>::output_size())
            .field("stretch", &self.stretch)
            .field("source", &self.source)
            .finish()
    }
}
