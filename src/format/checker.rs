//! Signature and suffix checks
//!
//! Byte-level detection compares a fixed magic sequence at a known offset.
//! Suffix detection compares the file name's extension.

use log::debug;

use crate::format::errors::{FormatError, FormatResult};
use crate::format::traits::Checker;
use crate::io::handle::DataHandle;

/// Checker that matches a magic byte sequence at a fixed offset
#[derive(Debug, Clone)]
pub struct SignatureChecker {
    signature: Vec<u8>,
    offset: u64,
}

impl SignatureChecker {
    /// Matches `signature` at the start of the file
    pub fn new(signature: &[u8]) -> Self {
        Self::at_offset(signature, 0)
    }

    /// Matches `signature` starting at `offset`
    pub fn at_offset(signature: &[u8], offset: u64) -> Self {
        SignatureChecker {
            signature: signature.to_vec(),
            offset,
        }
    }

    /// Offset the signature is expected at
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Checker for SignatureChecker {
    fn is_format(&self, handle: &mut DataHandle) -> FormatResult<bool> {
        match handle.seek(self.offset) {
            Ok(()) => {}
            Err(FormatError::OutOfBounds(_)) => return Ok(false),
            Err(e) => return Err(e),
        }

        let mut found = vec![0u8; self.signature.len()];
        let read = handle.read_available(&mut found)?;
        if read != self.signature.len() {
            debug!("Short read of {} signature bytes from {}", read, handle.name());
            return Ok(false);
        }

        Ok(found == self.signature)
    }

    fn signature(&self) -> Option<&[u8]> {
        Some(&self.signature)
    }
}

/// Whether `name` ends with one of `suffixes` (case-insensitive, dot-separated)
pub fn has_suffix(name: &str, suffixes: &[String]) -> bool {
    let lower = name.to_lowercase();
    suffixes.iter().any(|suffix| {
        let suffix = suffix.trim_start_matches('.').to_lowercase();
        lower.len() > suffix.len() && lower.ends_with(&suffix) && lower[..lower.len() - suffix.len()].ends_with('.')
    })
}
