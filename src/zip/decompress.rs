//! Raw DEFLATE decoding, delegated to `flate2`.

use std::io::{self, Read};

use flate2::read::DeflateDecoder;

/// Inflate a raw DEFLATE stream (no zlib header or checksum).
///
/// `size_hint` only pre-sizes the output; the stream decides the real length.
pub fn inflate_raw(data: &[u8], size_hint: usize) -> io::Result<Vec<u8>> {
    let mut output = Vec::with_capacity(size_hint);
    DeflateDecoder::new(data).read_to_end(&mut output)?;
    Ok(output)
}
