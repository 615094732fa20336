//! Operating system entropy sources.
//!
//! A [`RandomStream`] fills caller buffers with random bytes. The platform
//! source behind [`OsEntropySource`] is selected at compile time: a device
//! file on unix targets, a CryptoAPI provider handle on windows. Each variant
//! owns its handle exclusively and releases it exactly once on drop.
//!
//! There is no retry and no fallback. A failed read surfaces immediately.

/// Implements `RngCore` and `CryptoRng` for a platform source.
macro_rules! impl_os_rng {
    ($source:ty) => {
        impl rand_core::RngCore for $source {
            fn next_u32(&mut self) -> u32 {
                rand_core::impls::next_u32_via_fill(self)
            }

            fn next_u64(&mut self) -> u64 {
                rand_core::impls::next_u64_via_fill(self)
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                $crate::source::fill_or_panic(self, dest)
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
                $crate::source::RandomStream::read(self, dest)?;
                Ok(())
            }
        }

        impl rand_core::CryptoRng for $source {}
    };
}

pub(crate) use impl_os_rng;

#[cfg(unix)]
mod device;
#[cfg(windows)]
mod provider;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(unix)]
pub use device::DeviceSource;
#[cfg(windows)]
pub use provider::ProviderSource;

use crate::error::EntropyError;

/// Conventional secure random device on unix targets.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/urandom";

/// The platform entropy source for this build target.
#[cfg(unix)]
pub type OsEntropySource = DeviceSource;

/// The platform entropy source for this build target.
#[cfg(windows)]
pub type OsEntropySource = ProviderSource;

/// A stream of cryptographically secure random bytes.
pub trait RandomStream {
    /// Fills the whole of `buf` with random bytes.
    ///
    /// Returns the number of bytes written, which always equals `buf.len()`
    /// on success. On error the buffer contents must not be used.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError>;
}

impl<S: RandomStream + ?Sized> RandomStream for &mut S {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        (**self).read(buf)
    }
}

impl<S: RandomStream + ?Sized> RandomStream for Box<S> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        (**self).read(buf)
    }
}

/// Infallible fill used by the `RngCore` impls.
///
/// Panics rather than hand back bytes that did not come from the stream.
pub(crate) fn fill_or_panic<S: RandomStream + ?Sized>(stream: &mut S, dest: &mut [u8]) {
    if let Err(err) = stream.read(dest) {
        panic!("entropy stream failed: {err}");
    }
}
