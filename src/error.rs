//! Error types for reading ZIP archives.

use thiserror::Error;

/// Errors that can occur while reading an archive.
#[derive(Debug, Error)]
pub enum ZipError {
    /// A record signature did not match, or the buffer is too small to hold one.
    #[error("format error: {0}")]
    Format(&'static str),

    /// The codec rejected an entry's compressed stream.
    #[error("failed to decompress {file_name}: {source}")]
    Decompression {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Compression method other than STORED or DEFLATE.
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u16),

    /// A header or payload extends past the end of the buffer.
    #[error("read of {len} bytes at offset {offset} exceeds archive size {size}")]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    /// I/O error while loading the archive.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A decode task panicked or was cancelled.
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ZipError>;
