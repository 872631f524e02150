//! Streaming SHA-256 of files.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::error::HashError;

/// Read size while hashing.
const CHUNK_SIZE: usize = 256 * 1024;

/// A file and its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    pub path: PathBuf,
    /// Lowercase hex SHA-256.
    pub digest: String,
}

/// Hashes one file without loading it whole.
pub async fn file_sha256(path: &Path) -> Result<String, HashError> {
    let read_error = |source| HashError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).await.map_err(read_error)?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut hasher = Sha256::new();
    loop {
        let bytes_read = file.read(&mut buffer).await.map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hashes every file, keeping input order.
pub async fn hash_files<P: AsRef<Path>>(files: &[P]) -> Result<Vec<FileHash>, HashError> {
    let mut hashes = Vec::with_capacity(files.len());
    for path in files {
        let path = path.as_ref();
        hashes.push(FileHash {
            path: path.to_path_buf(),
            digest: file_sha256(path).await?,
        });
    }
    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[tokio::test]
    async fn test_known_digests() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        let abc = temp.path().join("abc");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&abc, b"abc").unwrap();

        assert_eq!(file_sha256(&empty).await.unwrap(), EMPTY_SHA256);
        assert_eq!(file_sha256(&abc).await.unwrap(), ABC_SHA256);
    }

    #[tokio::test]
    async fn test_large_file_spans_chunks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.bin");
        let data: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let expected = format!("{:x}", Sha256::digest(&data));
        assert_eq!(file_sha256(&path).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_hash_files_keeps_order() {
        let temp = TempDir::new().unwrap();
        let b = temp.path().join("b");
        let a = temp.path().join("a");
        std::fs::write(&b, b"abc").unwrap();
        std::fs::write(&a, b"").unwrap();

        let hashes = hash_files(&[&b, &a]).await.unwrap();
        assert_eq!(hashes[0].path, b);
        assert_eq!(hashes[0].digest, ABC_SHA256);
        assert_eq!(hashes[1].digest, EMPTY_SHA256);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = file_sha256(Path::new("/nonexistent/file")).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/file"));
    }
}
