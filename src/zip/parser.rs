//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures
//! from a fully resident byte buffer.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Walk the Central Directory, one variable-length header at a time
//! 3. For each entry, resolve where its data starts via the Local File Header
//!
//! Every step only borrows the buffer; nothing here copies payload bytes.

use tracing::{debug, trace, warn};

use crate::error::{Result, ZipError};

use super::options::{EocdSearch, ExtraFieldPolicy};
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Borrow `len` bytes at `offset`, failing instead of panicking when the
/// range runs past the end of `buf`.
pub fn slice_at(buf: &[u8], offset: u64, len: u64) -> Result<&[u8]> {
    let out_of_bounds = || ZipError::OutOfBounds {
        offset,
        len,
        size: buf.len() as u64,
    };
    let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
    if end > buf.len() as u64 {
        return Err(out_of_bounds());
    }
    Ok(&buf[offset as usize..end as usize])
}

/// Find and parse the End of Central Directory record.
///
/// Returns the record and its offset in `buf`.
///
/// # Errors
///
/// [`ZipError::Format`] if the buffer is smaller than the record or no
/// signature is found where `search` looks for one.
pub fn find_eocd(buf: &[u8], search: EocdSearch) -> Result<(EndOfCentralDirectory, u64)> {
    if buf.len() < EndOfCentralDirectory::SIZE {
        return Err(ZipError::Format("buffer too small for end record"));
    }

    let tail = buf.len() - EndOfCentralDirectory::SIZE;
    let record = &buf[tail..];

    match search {
        EocdSearch::FixedTail => {
            let eocd = EndOfCentralDirectory::from_bytes(record)?;
            debug!(offset = tail, "found end of central directory");
            return Ok((eocd, tail as u64));
        }
        EocdSearch::Backward => {
            // Common case: signature with an empty comment right at the tail
            if &record[0..4] == EndOfCentralDirectory::SIGNATURE && record[20..22] == [0, 0] {
                let eocd = EndOfCentralDirectory::from_bytes(record)?;
                debug!(offset = tail, "found end of central directory");
                return Ok((eocd, tail as u64));
            }
        }
    }

    let search_start = tail.saturating_sub(MAX_COMMENT_SIZE);
    for i in (search_start..tail).rev() {
        if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
            continue;
        }
        // The comment length must account for every remaining byte
        let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
        if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
            let eocd = EndOfCentralDirectory::from_bytes(&buf[i..])?;
            debug!(offset = i, comment_len, "found end of central directory before comment");
            return Ok((eocd, i as u64));
        }
    }

    Err(ZipError::Format("bad end signature"))
}

/// Lazy walk over the Central Directory.
///
/// Yields exactly `count` entries starting at `offset`. Each step parses one
/// header at the cursor and moves the cursor past its name, extra field and
/// comment. After the first error the walk stops.
pub struct CentralDirectory<'a> {
    buf: &'a [u8],
    cursor: u64,
    remaining: u16,
}

impl<'a> CentralDirectory<'a> {
    pub fn new(buf: &'a [u8], offset: u32, count: u16) -> Self {
        Self {
            buf,
            cursor: offset as u64,
            remaining: count,
        }
    }

    /// Parse the header at `cursor`, returning it with the cursor of the next one.
    fn step(buf: &[u8], cursor: u64) -> Result<(CentralDirectoryEntry, u64)> {
        // Only the fixed part has to be in range up front; the name is checked on parse
        slice_at(buf, cursor, CentralDirectoryEntry::SIZE as u64)?;
        let entry = CentralDirectoryEntry::from_bytes(&buf[cursor as usize..])?;
        let next = cursor + entry.record_len();
        Ok((entry, next))
    }
}

impl Iterator for CentralDirectory<'_> {
    type Item = Result<CentralDirectoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match Self::step(self.buf, self.cursor) {
            Ok((entry, next)) => {
                trace!(offset = self.cursor, name = %entry.file_name, "central directory entry");
                self.cursor = next;
                self.remaining -= 1;
                Some(Ok(entry))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

/// Resolves where each entry's payload starts.
#[derive(Debug, Clone, Copy)]
pub enum DataLocator {
    /// One extra field length, taken from the first local header.
    Shared { extra_field_len: u16 },
    /// Look up each entry's own local header.
    PerEntry,
}

impl DataLocator {
    /// Build a locator for `policy`.
    ///
    /// With [`ExtraFieldPolicy::FirstLocalHeader`] this reads the local header
    /// at offset 0 once.
    pub fn new(buf: &[u8], policy: ExtraFieldPolicy) -> Result<Self> {
        match policy {
            ExtraFieldPolicy::FirstLocalHeader => {
                let lfh = read_local_header(buf, 0)?;
                debug!(
                    extra_field_len = lfh.extra_field_len,
                    compressed_size = lfh.compressed_size,
                    uncompressed_size = lfh.uncompressed_size,
                    "using first local header extra field length for all entries"
                );
                Ok(DataLocator::Shared {
                    extra_field_len: lfh.extra_field_len,
                })
            }
            ExtraFieldPolicy::PerEntry => Ok(DataLocator::PerEntry),
        }
    }

    /// Offset of the first payload byte of `entry`.
    pub fn data_offset(&self, buf: &[u8], entry: &CentralDirectoryEntry) -> Result<u64> {
        let offset = match *self {
            DataLocator::Shared { extra_field_len } => {
                data_offset(entry.lfh_offset, entry.file_name_len, extra_field_len)
            }
            DataLocator::PerEntry => {
                let lfh = read_local_header(buf, entry.lfh_offset as u64)?;
                if lfh.compression_method != entry.compression_method {
                    warn!(
                        name = %entry.file_name,
                        central = ?entry.compression_method,
                        local = ?lfh.compression_method,
                        "local header disagrees with central directory on compression method"
                    );
                }
                data_offset(entry.lfh_offset, lfh.file_name_len, lfh.extra_field_len)
            }
        };
        trace!(name = %entry.file_name, offset, size = entry.compressed_size, "data offset");
        Ok(offset)
    }
}

/// Data starts after: LFH (30 bytes) + filename + extra field
pub fn data_offset(lfh_offset: u32, file_name_len: u16, extra_field_len: u16) -> u64 {
    LocalFileHeader::SIZE as u64 + lfh_offset as u64 + file_name_len as u64 + extra_field_len as u64
}

fn read_local_header(buf: &[u8], offset: u64) -> Result<LocalFileHeader> {
    let header = slice_at(buf, offset, LocalFileHeader::SIZE as u64)
        .map_err(|_| ZipError::Format("invalid local header"))?;
    LocalFileHeader::from_bytes(header)
}
