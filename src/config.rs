//! Stream configuration.
//!
//! The hash algorithm and stretch factor are fixed when a stream is opened.
//! Runtime selection happens here, once, by picking which monomorphic
//! [`HashMixer`](crate::mixing::HashMixer) to box.

use crate::error::EntropyError;
use crate::mixing::{Blake3Mixer, Sha1Mixer, Sha256Mixer, StretchFactor};
use crate::source::{RandomStream, DEFAULT_DEVICE_PATH};
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::path::{Path, PathBuf};

/// Hash algorithms available to the mixer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1, 160-bit digest.
    #[default]
    Sha1,
    /// SHA-256, 256-bit digest.
    Sha256,
    /// BLAKE3, 256-bit digest.
    Blake3,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => <sha1::Sha1 as Digest>::output_size(),
            Self::Sha256 => <sha2::Sha256 as Digest>::output_size(),
            Self::Blake3 => <blake3::Hasher as Digest>::output_size(),
        }
    }
}

/// How the CLI renders random bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lowercase hex, one line per block.
    #[default]
    Hex,
    /// Raw bytes.
    Binary,
}

/// Mixer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Hash used to mix each pull.
    pub algorithm: HashAlgorithm,
    /// Digest lengths of raw entropy hashed per output segment.
    pub stretch_factor: usize,
    /// Bypass the mixer and read the OS source directly.
    pub raw: bool,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            stretch_factor: StretchFactor::DEFAULT.get(),
            raw: false,
        }
    }
}

impl MixerConfig {
    /// Returns the validated stretch factor.
    pub fn stretch(&self) -> Result<StretchFactor, ConfigError> {
        StretchFactor::new(self.stretch_factor).ok_or(ConfigError::InvalidStretchFactor)
    }
}

/// OS source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Random device to read. Ignored on windows.
    pub device_path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Bytes per read.
    pub bytes: usize,
    /// Rendering of each block.
    pub format: OutputFormat,
    /// Keep writing blocks until interrupted.
    pub stream: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bytes: 32,
            format: OutputFormat::default(),
            stream: false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("stretch factor must be between 1 and {}", StretchFactor::MAX)]
    InvalidStretchFactor,
    #[error("output byte count must be at least 1")]
    InvalidByteCount,
    #[error("device path is empty")]
    EmptyDevicePath,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error(transparent)]
    Source(#[from] EntropyError),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[mixer]` table.
    #[serde(default)]
    pub mixer: MixerConfig,
    /// `[source]` table.
    #[serde(default)]
    pub source: SourceConfig,
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mixer.stretch()?;
        if self.output.bytes == 0 {
            return Err(ConfigError::InvalidByteCount);
        }
        if self.source.device_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDevicePath);
        }
        Ok(())
    }

    /// Opens the configured stream.
    ///
    /// The returned stream owns its OS resource; dropping it releases the
    /// resource.
    pub fn open_stream(&self) -> Result<Box<dyn RandomStream>, ConfigError> {
        let stretch = self.mixer.stretch()?;
        let source = self.open_source()?;

        if self.mixer.raw {
            tracing::info!("Using raw OS entropy, mixer bypassed");
            return Ok(Box::new(source));
        }

        tracing::info!(
            algorithm = ?self.mixer.algorithm,
            stretch = stretch.get(),
            "Using hash-mixed entropy"
        );

        let stream: Box<dyn RandomStream> = match self.mixer.algorithm {
            HashAlgorithm::Sha1 => Box::new(Sha1Mixer::with_stretch(source, stretch)),
            HashAlgorithm::Sha256 => Box::new(Sha256Mixer::with_stretch(source, stretch)),
            HashAlgorithm::Blake3 => Box::new(Blake3Mixer::with_stretch(source, stretch)),
        };
        Ok(stream)
    }

    #[cfg(unix)]
    fn open_source(&self) -> Result<crate::OsEntropySource, EntropyError> {
        crate::source::DeviceSource::open_path(&self.source.device_path)
    }

    #[cfg(windows)]
    fn open_source(&self) -> Result<crate::OsEntropySource, EntropyError> {
        crate::source::ProviderSource::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mixer.algorithm, HashAlgorithm::Sha1);
        assert_eq!(config.mixer.stretch_factor, 5);
    }

    #[test]
    fn test_zero_stretch_invalid() {
        let mut config = FileConfig::default();
        config.mixer.stretch_factor = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStretchFactor)
        ));
    }

    #[test]
    fn test_oversized_stretch_invalid() {
        let mut config = FileConfig::default();
        config.mixer.stretch_factor = StretchFactor::MAX + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStretchFactor)
        ));

        config.mixer.stretch_factor = usize::MAX / 19;
        assert!(matches!(
            config.open_stream().err(),
            Some(ConfigError::InvalidStretchFactor)
        ));
    }

    #[test]
    fn test_zero_bytes_invalid() {
        let mut config = FileConfig::default();
        config.output.bytes = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidByteCount)
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = FileConfig::from_toml(
            r#"
            [mixer]
            algorithm = "blake3"
            stretch_factor = 2

            [output]
            format = "binary"
            "#,
        )
        .unwrap();

        assert_eq!(config.mixer.algorithm, HashAlgorithm::Blake3);
        assert_eq!(config.mixer.stretch_factor, 2);
        assert!(!config.mixer.raw);
        assert_eq!(config.output.format, OutputFormat::Binary);
        assert_eq!(config.output.bytes, 32);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = FileConfig::from_toml("[mixer]\nalgorithm = \"md5\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_digest_lengths() {
        assert_eq!(HashAlgorithm::Sha1.digest_len(), 20);
        assert_eq!(HashAlgorithm::Sha256.digest_len(), 32);
        assert_eq!(HashAlgorithm::Blake3.digest_len(), 32);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_device_surfaces_unavailable() {
        let mut config = FileConfig::default();
        config.source.device_path = PathBuf::from("/nonexistent/entropy-stream/random");

        match config.open_stream() {
            Err(ConfigError::Source(err)) => assert!(err.is_unavailable()),
            other => panic!("expected unavailable source, got {:?}", other.err()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_open_stream_for_each_algorithm() {
        for algorithm in [HashAlgorithm::Sha1, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let mut config = FileConfig::default();
            config.mixer.algorithm = algorithm;

            let mut stream = config.open_stream().unwrap();
            let mut buf = [0u8; 45];
            assert_eq!(stream.read(&mut buf).unwrap(), 45);
        }

        let mut config = FileConfig::default();
        config.mixer.raw = true;
        let mut stream = config.open_stream().unwrap();
        let mut buf = [0u8; 45];
        assert_eq!(stream.read(&mut buf).unwrap(), 45);
    }
}
