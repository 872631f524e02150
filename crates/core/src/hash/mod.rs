//! SHA-256 digests of files, for checking that encodes are reproducible.

mod digest;
mod error;
mod render;

pub use digest::{file_sha256, hash_files, FileHash};
pub use error::HashError;
pub use render::{render_hashes, HashRenderOptions};
