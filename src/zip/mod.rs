//! ZIP archive parsing and extraction.
//!
//! This module reads a ZIP archive that is fully resident in memory and
//! decodes its entries concurrently.
//!
//! ## Architecture
//!
//! - [`structures`]: fixed-layout records (EOCD, central and local headers)
//! - [`parser`]: locating the EOCD, walking the Central Directory and
//!   resolving data offsets
//! - [`decompress`]: raw DEFLATE decoding through `flate2`
//! - [`extractor`]: the [`ZipArchive`] API that ties the stages together
//! - [`options`]: knobs for the places where archives in the wild disagree
//!
//! ## Supported Features
//!
//! - STORED and DEFLATE entries
//! - Archive comments (backward EOCD scan)
//!
//! ## Limitations
//!
//! - No ZIP64
//! - No encryption
//! - No multi-disk archive support
//! - No CRC validation

mod decompress;
mod extractor;
mod options;
mod parser;
mod structures;

pub use decompress::inflate_raw;
pub use extractor::{ZipArchive, decode_entry};
pub use options::{EocdSearch, ExtraFieldPolicy, MethodDispatch, ReadOptions};
pub use parser::{CentralDirectory, DataLocator, data_offset, find_eocd, slice_at};
pub use structures::*;

use std::sync::Arc;

use crate::error::Result;

/// Decode every entry of `buf` with the default [`ReadOptions`].
pub async fn read_zip(buf: impl Into<Arc<[u8]>>) -> Result<Vec<Entry>> {
    ZipArchive::new(buf).extract_all().await
}
