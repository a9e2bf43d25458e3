// fairy-core/src/infrastructure/hashing.rs
//
// Content hashes of input and rulepack files. Line endings are normalized
// before hashing so a file checked out with CRLF hashes like its LF twin.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::instrument;

use crate::infrastructure::error::InfrastructureError;

pub use crate::domain::canonical::{canonical_json, hash_canonical_json};

const CHUNK_SIZE: usize = 64 * 1024;

/// Incremental SHA-256 that rewrites `\r\n` and lone `\r` to `\n`, including
/// a `\r\n` pair split across two `update` calls.
#[derive(Default)]
pub struct NormalizingHasher {
    inner: Sha256,
    pending_cr: bool,
}

impl NormalizingHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let mut out = Vec::with_capacity(chunk.len() + 1);
        let mut rest = chunk;

        if self.pending_cr {
            self.pending_cr = false;
            out.push(b'\n');
            if let Some(tail) = rest.strip_prefix(b"\n") {
                rest = tail;
            }
        }

        let mut iter = rest.iter().copied().peekable();
        while let Some(b) = iter.next() {
            if b != b'\r' {
                out.push(b);
                continue;
            }
            match iter.peek() {
                Some(b'\n') => {
                    iter.next();
                    out.push(b'\n');
                }
                Some(_) => out.push(b'\n'),
                None => self.pending_cr = true,
            }
        }
        self.inner.update(&out);
    }

    pub fn finalize(mut self) -> String {
        if self.pending_cr {
            self.inner.update(b"\n");
        }
        hex::encode(self.inner.finalize())
    }
}

/// Newline-normalized SHA-256 of in-memory bytes.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut h = NormalizingHasher::new();
    h.update(bytes);
    h.finalize()
}

/// Newline-normalized SHA-256 of a file, streamed in 64 KiB chunks.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn hash_file(path: &Path) -> Result<String, InfrastructureError> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut hasher = NormalizingHasher::new();
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::canonical::sha256_hex;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_line_endings_are_normalized() {
        let lf = hash_bytes(b"a\tb\n1\t2\n");
        assert_eq!(hash_bytes(b"a\tb\r\n1\t2\r\n"), lf);
        assert_eq!(hash_bytes(b"a\tb\r1\t2\r"), lf);
        assert_eq!(lf, sha256_hex(b"a\tb\n1\t2\n"));
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut h = NormalizingHasher::new();
        h.update(b"a\r");
        h.update(b"\nb");
        assert_eq!(h.finalize(), sha256_hex(b"a\nb"));

        let mut h = NormalizingHasher::new();
        h.update(b"a\r");
        h.update(b"");
        h.update(b"b");
        assert_eq!(h.finalize(), sha256_hex(b"a\nb"));
    }

    #[test]
    fn test_trailing_cr() {
        assert_eq!(hash_bytes(b"x\r"), sha256_hex(b"x\n"));
    }

    #[test]
    fn test_hash_file_matches_bytes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("big.tsv");
        // larger than one chunk, with a CRLF straddling the boundary
        let mut content = vec![b'x'; CHUNK_SIZE - 1];
        content.extend_from_slice(b"\r\nend\r\n");
        std::fs::write(&path, &content)?;

        let mut expected = vec![b'x'; CHUNK_SIZE - 1];
        expected.extend_from_slice(b"\nend\n");
        assert_eq!(hash_file(&path)?, sha256_hex(&expected));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = hash_file(Path::new("/definitely/not/here.tsv")).unwrap_err();
        assert!(matches!(err, InfrastructureError::Io(_)));
    }
}
