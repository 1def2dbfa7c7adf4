//! Builds small ZIP archives byte by byte for the integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

pub struct TestEntry {
    pub name: String,
    pub content: Vec<u8>,
    pub method: u16,
    /// Method written to the headers when it differs from how the payload was encoded
    pub header_method: Option<u16>,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
}

impl TestEntry {
    pub fn deflated(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_vec(),
            method: METHOD_DEFLATE,
            header_method: None,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
        }
    }

    pub fn stored(name: &str, content: &[u8]) -> Self {
        Self {
            method: METHOD_STORED,
            ..Self::deflated(name, content)
        }
    }

    pub fn method(mut self, method: u16) -> Self {
        self.header_method = Some(method);
        self
    }

    pub fn local_extra(mut self, len: usize) -> Self {
        self.local_extra = vec![0x5A; len];
        self
    }

    pub fn central_extra(mut self, len: usize) -> Self {
        self.central_extra = vec![0xA5; len];
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn payload(entry: &TestEntry) -> Vec<u8> {
    match entry.method {
        METHOD_DEFLATE => deflate(&entry.content),
        _ => entry.content.clone(),
    }
}

/// Layout returned alongside the archive so tests can corrupt specific records.
pub struct Layout {
    pub local_offsets: Vec<usize>,
    pub cd_offset: usize,
    pub eocd_offset: usize,
}

pub fn build_zip(entries: &[TestEntry]) -> Vec<u8> {
    build_zip_with_comment(entries, b"").0
}

pub fn build_zip_with_comment(entries: &[TestEntry], archive_comment: &[u8]) -> (Vec<u8>, Layout) {
    let mut buf = Vec::new();
    let mut local_offsets = Vec::new();
    let mut payload_sizes = Vec::new();

    for entry in entries {
        let data = payload(entry);
        local_offsets.push(buf.len());
        payload_sizes.push(data.len() as u32);

        buf.extend_from_slice(b"PK\x03\x04");
        buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
        buf.extend_from_slice(&0u16.to_le_bytes()); // flags
        buf.extend_from_slice(&entry.header_method.unwrap_or(entry.method).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // mod time
        buf.extend_from_slice(&0u16.to_le_bytes()); // mod date
        buf.extend_from_slice(&0u32.to_le_bytes()); // crc32
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(entry.content.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(entry.local_extra.len() as u16).to_le_bytes());
        buf.extend_from_slice(entry.name.as_bytes());
        buf.extend_from_slice(&entry.local_extra);
        buf.extend_from_slice(&data);
    }

    let cd_offset = buf.len();
    for (i, entry) in entries.iter().enumerate() {
        buf.extend_from_slice(b"PK\x01\x02");
        buf.extend_from_slice(&20u16.to_le_bytes()); // version made by
        buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
        buf.extend_from_slice(&0u16.to_le_bytes()); // flags
        buf.extend_from_slice(&entry.header_method.unwrap_or(entry.method).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // mod time
        buf.extend_from_slice(&0u16.to_le_bytes()); // mod date
        buf.extend_from_slice(&0u32.to_le_bytes()); // crc32
        buf.extend_from_slice(&payload_sizes[i].to_le_bytes());
        buf.extend_from_slice(&(entry.content.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(entry.central_extra.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(entry.comment.len() as u16).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // disk number start
        buf.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        buf.extend_from_slice(&0u32.to_le_bytes()); // external attrs
        buf.extend_from_slice(&(local_offsets[i] as u32).to_le_bytes());
        buf.extend_from_slice(entry.name.as_bytes());
        buf.extend_from_slice(&entry.central_extra);
        buf.extend_from_slice(&entry.comment);
    }
    let cd_size = buf.len() - cd_offset;

    let eocd_offset = buf.len();
    buf.extend_from_slice(b"PK\x05\x06");
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(cd_size as u32).to_le_bytes());
    buf.extend_from_slice(&(cd_offset as u32).to_le_bytes());
    buf.extend_from_slice(&(archive_comment.len() as u16).to_le_bytes());
    buf.extend_from_slice(archive_comment);

    let layout = Layout {
        local_offsets,
        cd_offset,
        eocd_offset,
    };
    (buf, layout)
}
