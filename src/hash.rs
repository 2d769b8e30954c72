//! BLAKE3 fingerprints of license and notice files
//!
//! Fingerprints cover the exact bytes of a file. No line-ending, whitespace
//! or encoding normalization is applied, so two copies that differ only by a
//! trailing newline produce different fingerprints.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::domain::Fingerprint;
use crate::error::{LicenseCollectError, Result};

/// Hash prefix for BLAKE3 fingerprints
pub const HASH_PREFIX: &str = "blake3:";

fn read_error(path: &Path, e: &std::io::Error) -> LicenseCollectError {
    LicenseCollectError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Fingerprint a file's contents.
///
/// Any open or read error is returned; a partially read file never yields a
/// fingerprint.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let file = File::open(path).map_err(|e| read_error(path, &e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| read_error(path, &e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint::new(format!(
        "{}{}",
        HASH_PREFIX,
        hasher.finalize().to_hex()
    )))
}

/// Fingerprint an in-memory buffer
#[cfg(test)]
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    Fingerprint::new(format!("{}{}", HASH_PREFIX, blake3::hash(bytes).to_hex()))
}
