//! CryptoAPI provider entropy source for windows targets.

#![allow(unsafe_code)]

use super::{impl_os_rng, RandomStream};
use crate::error::EntropyError;
use std::io;
use std::ptr;
use windows_sys::Win32::Security::Cryptography::{
    CryptAcquireContextW, CryptGenRandom, CryptReleaseContext, CRYPT_VERIFYCONTEXT, PROV_RSA_FULL,
};

const PROVIDER: &str = "CryptoAPI PROV_RSA_FULL (verify context)";

/// Largest request a single `CryptGenRandom` call accepts.
const MAX_CALL_LEN: usize = u32::MAX as usize;

/// Reads random bytes from a CryptoAPI provider context.
///
/// The context is acquired with `CRYPT_VERIFYCONTEXT`, so no key container
/// is touched. It is released exactly once when the source is dropped.
pub struct ProviderSource {
    handle: usize,
}

impl ProviderSource {
    /// Acquires a provider context.
    pub fn open() -> Result<Self, EntropyError> {
        let mut handle: usize = 0;

        // SAFETY: `handle` is a valid out pointer; null container and provider
        // names select the default provider for the type.
        let ok = unsafe {
            CryptAcquireContextW(
                &mut handle,
                ptr::null(),
                ptr::null(),
                PROV_RSA_FULL,
                CRYPT_VERIFYCONTEXT,
            )
        };
        if ok == 0 {
            return Err(EntropyError::unavailable(PROVIDER, io::Error::last_os_error()));
        }

        tracing::info!(provider = PROVIDER, "Entropy provider acquired");
        Ok(Self { handle })
    }
}

impl RandomStream for ProviderSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        if buf.is_empty() {
            return Ok(0);
        }

        for chunk in buf.chunks_mut(MAX_CALL_LEN) {
            let len = u32::try_from(chunk.len()).map_err(|_| {
                EntropyError::read(
                    chunk.len(),
                    io::Error::new(io::ErrorKind::InvalidInput, "request exceeds u32"),
                )
            })?;

            // SAFETY: `chunk` is a live, writable region of exactly `len` bytes
            // and `self.handle` stays acquired until drop.
            let ok = unsafe { CryptGenRandom(self.handle, len, chunk.as_mut_ptr()) };
            if ok == 0 {
                let err = io::Error::last_os_error();
                tracing::warn!(requested = chunk.len(), error = %err, "CryptGenRandom failed");
                return Err(EntropyError::read(chunk.len(), err));
            }
        }

        Ok(buf.len())
    }
}

impl_os_rng!(ProviderSource);

impl std::fmt::Debug for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSource").finish_non_exhaustive()
    }
}

impl Drop for ProviderSource {
    fn drop(&mut self) {
        // SAFETY: the handle was acquired in `open` and is released only here.
        let ok = unsafe { CryptReleaseContext(self.handle, 0) };
        if ok == 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "CryptReleaseContext failed");
        } else {
            tracing::info!(provider = PROVIDER, "Entropy provider released");
        }
    }
}
