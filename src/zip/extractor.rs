use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{Result, ZipError};

use super::decompress::inflate_raw;
use super::options::{MethodDispatch, ReadOptions};
use super::parser::{CentralDirectory, DataLocator, find_eocd, slice_at};
use super::structures::{CentralDirectoryEntry, CompressionMethod, Entry};

/// An archive held entirely in memory.
///
/// Parsing the directory is synchronous; decoding fans out one blocking
/// task per entry, all reading the same shared buffer.
#[derive(Debug, Clone)]
pub struct ZipArchive {
    buf: Arc<[u8]>,
    options: ReadOptions,
}

impl ZipArchive {
    pub fn new(buf: impl Into<Arc<[u8]>>) -> Self {
        Self {
            buf: buf.into(),
            options: ReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// List all entries in Central Directory order without decoding anything.
    pub fn list_files(&self) -> Result<Vec<CentralDirectoryEntry>> {
        let (eocd, eocd_offset) = find_eocd(&self.buf, self.options.eocd_search)?;
        debug!(
            eocd_offset,
            entries = eocd.disk_entries,
            total_entries = eocd.total_entries,
            cd_offset = eocd.cd_offset,
            cd_size = eocd.cd_size,
            "reading central directory"
        );

        CentralDirectory::new(&self.buf, eocd.cd_offset, eocd.disk_entries).collect()
    }

    /// Decode a single entry.
    pub async fn extract(&self, entry: &CentralDirectoryEntry) -> Result<Entry> {
        let locator = DataLocator::new(&self.buf, self.options.extra_field_policy)?;
        let dispatch = self.options.method_dispatch;
        let buf = Arc::clone(&self.buf);
        let entry = entry.clone();

        tokio::task::spawn_blocking(move || {
            let offset = locator.data_offset(&buf, &entry)?;
            decode_entry(&buf, entry, offset, dispatch)
        })
        .await?
    }

    /// Decode every entry concurrently, in directory order.
    pub async fn extract_all(&self) -> Result<Vec<Entry>> {
        let entries = self.list_files()?;
        self.extract_many(entries).await
    }

    /// Decode `entries` concurrently.
    ///
    /// Output follows the order of `entries`. The first failure observed is
    /// returned and no entries are; decodes that have not started yet are
    /// cancelled.
    pub async fn extract_many(&self, entries: Vec<CentralDirectoryEntry>) -> Result<Vec<Entry>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let locator = DataLocator::new(&self.buf, self.options.extra_field_policy)?;
        let dispatch = self.options.method_dispatch;
        let count = entries.len();

        let mut tasks = JoinSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let buf = Arc::clone(&self.buf);
            tasks.spawn_blocking(move || {
                let offset = locator.data_offset(&buf, &entry)?;
                decode_entry(&buf, entry, offset, dispatch).map(|decoded| (index, decoded))
            });
        }
        debug!(count, "dispatched decode tasks");

        let mut slots: Vec<Option<Entry>> = (0..count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, decoded) = joined??;
            slots[index] = Some(decoded);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Decode one entry whose payload starts at `data_offset`.
///
/// # Errors
///
/// - [`ZipError::OutOfBounds`] if the payload runs past the buffer
/// - [`ZipError::UnsupportedCompression`] for methods other than STORED and
///   DEFLATE, under [`MethodDispatch::FromHeader`]
/// - [`ZipError::Decompression`] if the codec rejects the stream
pub fn decode_entry(
    buf: &[u8],
    entry: CentralDirectoryEntry,
    data_offset: u64,
    dispatch: MethodDispatch,
) -> Result<Entry> {
    let compressed = slice_at(buf, data_offset, entry.compressed_size as u64)?;

    let method = match dispatch {
        MethodDispatch::AssumeDeflate => CompressionMethod::Deflate,
        MethodDispatch::FromHeader => entry.compression_method,
    };

    let data = match method {
        CompressionMethod::Stored => compressed.to_vec(),
        CompressionMethod::Deflate => {
            inflate_raw(compressed, entry.uncompressed_size as usize).map_err(|source| {
                ZipError::Decompression {
                    file_name: entry.file_name.clone(),
                    source,
                }
            })?
        }
        CompressionMethod::Unknown(code) => return Err(ZipError::UnsupportedCompression(code)),
    };

    Ok(Entry {
        file_name: entry.file_name,
        data,
    })
}
