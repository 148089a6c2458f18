//! Content fingerprints for files

use crate::types::Digest;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::trace;

const READ_CHUNK: usize = 64 * 1024;

/// Compute the BLAKE3 digest of a file by streaming its full content.
pub fn fingerprint(path: &Path) -> io::Result<Digest> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(READ_CHUNK, file);
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(*hasher.finalize().as_bytes())
}

/// Decide whether two files have identical content.
///
/// Files of different length are different without reading them. Equality is
/// only concluded from full-content digests, never from size or mtime.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let len_a = std::fs::metadata(a)?.len();
    let len_b = std::fs::metadata(b)?.len();
    if len_a != len_b {
        return Ok(false);
    }
    let (digest_a, digest_b) = (fingerprint(a)?, fingerprint(b)?);
    if digest_a != digest_b {
        trace!(
            left = %a.display(),
            left_digest = %to_hex(&digest_a),
            right = %b.display(),
            right_digest = %to_hex(&digest_b),
            "Content fingerprints differ"
        );
        return Ok(false);
    }
    Ok(true)
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
