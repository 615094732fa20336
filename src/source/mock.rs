//! Scripted streams for exercising stream consumers in tests.

use super::RandomStream;
use crate::error::EntropyError;
use std::io;

/// Deterministic stream that records every pull.
///
/// Each pull is filled with a distinct byte pattern derived from the pull
/// index, so different pulls never produce the same bytes. Reads fail once
/// `fail_after` pulls have succeeded.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    pulls: Vec<usize>,
    fail_after: Option<usize>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_after(pulls: usize) -> Self {
        Self {
            pulls: Vec::new(),
            fail_after: Some(pulls),
        }
    }

    /// Lengths of every successful pull, in order.
    pub(crate) fn pulls(&self) -> &[usize] {
        &self.pulls
    }

    /// The bytes pull number `index` produces for a buffer of `len` bytes.
    pub(crate) fn pattern(index: usize, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| (i as u64).wrapping_mul(31).wrapping_add(index as u64 * 7919) as u8)
            .collect()
    }
}

impl RandomStream for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.fail_after == Some(self.pulls.len()) {
            return Err(EntropyError::read(
                buf.len(),
                io::Error::from_raw_os_error(5),
            ));
        }

        buf.copy_from_slice(&Self::pattern(self.pulls.len(), buf.len()));
        self.pulls.push(buf.len());
        Ok(buf.len())
    }
}
