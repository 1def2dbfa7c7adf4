//! # bufzip
//!
//! A ZIP reader for archives that are already fully in memory.
//!
//! The reader finds the End of Central Directory record, walks the Central
//! Directory, resolves each entry's payload through its Local File Header and
//! decodes all entries concurrently on the tokio blocking pool. Nothing is
//! streamed and the buffer is never modified.
//!
//! ## Features
//!
//! - STORED and raw DEFLATE entries
//! - Concurrent, fail-fast batch decoding with output in directory order
//! - Archives with trailing comments
//! - A compatibility mode reproducing minimal fixed-offset readers
//!
//! ## Example
//!
//! ```no_run
//! use bufzip::{ReadOptions, ZipArchive};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("archive.zip")?;
//!     let archive = ZipArchive::new(bytes).with_options(ReadOptions::default());
//!
//!     for entry in archive.extract_all().await? {
//!         println!("{}: {} bytes", entry.file_name, entry.data.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use zip::{
    CentralDirectoryEntry, CompressionMethod, EocdSearch, Entry, ExtraFieldPolicy, MethodDispatch,
    ReadOptions, ZipArchive, read_zip,
};
