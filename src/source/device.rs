//! Device file entropy source for unix targets.

use super::{impl_os_rng, RandomStream, DEFAULT_DEVICE_PATH};
use crate::error::EntropyError;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reads random bytes from a secure random device file.
///
/// `std::fs::File` performs no userspace buffering, so every read goes
/// straight to the kernel and no entropy is cached between calls. The file
/// descriptor is closed when the source is dropped.
pub struct DeviceSource {
    file: File,
    path: PathBuf,
}

impl DeviceSource {
    /// Opens the default device, `/dev/urandom`.
    pub fn open() -> Result<Self, EntropyError> {
        Self::open_path(DEFAULT_DEVICE_PATH)
    }

    /// Opens a specific device path.
    ///
    /// Fails with [`EntropyError::ResourceUnavailable`] if the path cannot be
    /// opened for reading or names a directory.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, EntropyError> {
        let path = path.as_ref();
        let resource = || path.display().to_string();

        let file = File::open(path).map_err(|e| EntropyError::unavailable(resource(), e))?;

        // `file` is closed on every early return below.
        let metadata = file
            .metadata()
            .map_err(|e| EntropyError::unavailable(resource(), e))?;
        if metadata.is_dir() {
            return Err(EntropyError::unavailable(
                resource(),
                io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
            ));
        }

        tracing::info!(path = %path.display(), "Entropy device opened");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Returns the device path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RandomStream for DeviceSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        if buf.is_empty() {
            return Ok(0);
        }

        // read_exact resumes after EINTR and short reads; EOF is an error.
        if let Err(err) = self.file.read_exact(buf) {
            tracing::warn!(
                path = %self.path.display(),
                requested = buf.len(),
                error = %err,
                "Entropy device read failed"
            );
            return Err(EntropyError::read(buf.len(), err));
        }

        Ok(buf.len())
    }
}

impl_os_rng!(DeviceSource);

impl std::fmt::Debug for DeviceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Drop for DeviceSource {
    fn drop(&mut self) {
        tracing::info!(path = %self.path.display(), "Entropy device closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("entropy-stream-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_default_device_fills_buffer() {
        let mut source = DeviceSource::open().unwrap();
        assert_eq!(source.path(), Path::new(DEFAULT_DEVICE_PATH));

        let mut buf = [0u8; 64];
        assert_eq!(source.read(&mut buf).unwrap(), 64);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_consecutive_reads_differ() {
        let mut source = DeviceSource::open().unwrap();

        for _ in 0..16 {
            let mut a = [0u8; 32];
            let mut b = [0u8; 32];
            source.read(&mut a).unwrap();
            source.read(&mut b).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_empty_buffer_reads_nothing() {
        let mut source = DeviceSource::open().unwrap();
        assert_eq!(source.read(&mut []).unwrap(), 0);
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        let result = DeviceSource::open_path("/nonexistent/entropy-stream/random");
        let err = result.unwrap_err();
        assert!(matches!(err, EntropyError::ResourceUnavailable { .. }));
        assert!(err.os_code().is_some());
    }

    #[test]
    fn test_directory_is_unavailable() {
        let result = DeviceSource::open_path(std::env::temp_dir());
        assert!(matches!(
            result,
            Err(EntropyError::ResourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_short_file_is_read_failure() {
        let path = temp_path("short");
        File::create(&path).unwrap().write_all(&[0xAB; 8]).unwrap();

        let mut source = DeviceSource::open_path(&path).unwrap();
        let mut buf = [0u8; 16];
        let result = source.read(&mut buf);

        assert!(matches!(
            result,
            Err(EntropyError::ReadFailure { requested: 16, .. })
        ));

        drop(source);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_try_fill_bytes_maps_error() {
        use rand_core::RngCore;

        let path = temp_path("empty");
        File::create(&path).unwrap();

        let mut source = DeviceSource::open_path(&path).unwrap();
        let mut buf = [0u8; 4];
        assert!(source.try_fill_bytes(&mut buf).is_err());

        drop(source);
        std::fs::remove_file(&path).unwrap();
    }
}
