mod local;
mod memory;

pub use local::LocalFileReader;
pub use memory::MemoryReader;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Result, ZipError};

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Load the whole source into memory.
    async fn read_all(&self) -> Result<Arc<[u8]>> {
        let mut buf = vec![0u8; self.size() as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                return Err(ZipError::Io(std::io::ErrorKind::UnexpectedEof.into()));
            }
            filled += n;
        }
        Ok(buf.into())
    }
}
