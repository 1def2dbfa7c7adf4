use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Result, ZipError};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes when the comment is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ZipError::Format("bad end signature"));
        }

        let mut cursor = Cursor::new(&data[4..Self::SIZE]);

        Ok(Self {
            disk_number: cursor.read_u16::<LittleEndian>()?,
            disk_with_cd: cursor.read_u16::<LittleEndian>()?,
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus name, extra field and comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryEntry {
    pub file_name: String,
    pub file_name_len: u16,
    pub extra_field_len: u16,
    pub comment_len: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub lfh_offset: u32,
}

impl CentralDirectoryEntry {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const SIZE: usize = 46;

    /// Parse the fixed header and the file name that follows it.
    ///
    /// `data` must start at the signature; it may extend past the record.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ZipError::Format("invalid CEN entry"));
        }

        let mut cursor = Cursor::new(&data[4..Self::SIZE]);
        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_len = cursor.read_u16::<LittleEndian>()?;
        let extra_field_len = cursor.read_u16::<LittleEndian>()?;
        let comment_len = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()?;

        let name_end = Self::SIZE + file_name_len as usize;
        if data.len() < name_end {
            return Err(ZipError::OutOfBounds {
                offset: Self::SIZE as u64,
                len: file_name_len as u64,
                size: data.len() as u64,
            });
        }
        let file_name = String::from_utf8_lossy(&data[Self::SIZE..name_end]).into_owned();

        Ok(Self {
            file_name,
            file_name_len,
            extra_field_len,
            comment_len,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            lfh_offset,
        })
    }

    /// Total on-disk size of this record, i.e. the distance to the next one.
    pub fn record_len(&self) -> u64 {
        Self::SIZE as u64
            + self.file_name_len as u64
            + self.extra_field_len as u64
            + self.comment_len as u64
    }

    pub fn is_directory(&self) -> bool {
        self.file_name.ends_with('/')
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

/// Local File Header (LFH) - 30 bytes plus name and extra field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_len: u16,
    pub extra_field_len: u16,
}

impl LocalFileHeader {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const SIZE: usize = 30;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ZipError::Format("invalid local header"));
        }

        let mut cursor = Cursor::new(&data[..Self::SIZE]);
        cursor.set_position(8);
        let compression_method = cursor.read_u16::<LittleEndian>()?;

        cursor.set_position(18);
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_len = cursor.read_u16::<LittleEndian>()?;
        let extra_field_len = cursor.read_u16::<LittleEndian>()?;

        Ok(Self {
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            file_name_len,
            extra_field_len,
        })
    }
}

/// A decoded archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eocd_bytes(entries: u16, cd_size: u32, cd_offset: u32) -> Vec<u8> {
        let mut buf = b"PK\x05\x06".to_vec();
        buf.extend_from_slice(&[0, 0, 0, 0]);
        buf.extend_from_slice(&entries.to_le_bytes());
        buf.extend_from_slice(&entries.to_le_bytes());
        buf.extend_from_slice(&cd_size.to_le_bytes());
        buf.extend_from_slice(&cd_offset.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf
    }

    #[test]
    fn test_eocd_fields() {
        let eocd = EndOfCentralDirectory::from_bytes(&eocd_bytes(3, 150, 4096)).unwrap();
        assert_eq!(eocd.disk_entries, 3);
        assert_eq!(eocd.total_entries, 3);
        assert_eq!(eocd.cd_size, 150);
        assert_eq!(eocd.cd_offset, 4096);
        assert_eq!(eocd.comment_len, 0);
    }

    #[test]
    fn test_eocd_bad_signature() {
        let mut bytes = eocd_bytes(1, 0, 0);
        bytes[3] = 0x07;
        let err = EndOfCentralDirectory::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ZipError::Format("bad end signature")));
    }

    #[test]
    fn test_cdfh_name_and_lengths() {
        let mut buf = b"PK\x01\x02".to_vec();
        buf.resize(CentralDirectoryEntry::SIZE, 0);
        buf[10..12].copy_from_slice(&8u16.to_le_bytes());
        buf[20..24].copy_from_slice(&11u32.to_le_bytes());
        buf[28..30].copy_from_slice(&7u16.to_le_bytes());
        buf[30..32].copy_from_slice(&4u16.to_le_bytes());
        buf[32..34].copy_from_slice(&2u16.to_le_bytes());
        buf[42..46].copy_from_slice(&64u32.to_le_bytes());
        buf.extend_from_slice("dir/ä.".as_bytes());

        let entry = CentralDirectoryEntry::from_bytes(&buf).unwrap();
        assert_eq!(entry.compression_method, CompressionMethod::Deflate);
        assert_eq!(entry.compressed_size, 11);
        assert_eq!(entry.lfh_offset, 64);
        assert_eq!(entry.file_name, "dir/ä.");
        assert_eq!(entry.record_len(), 46 + 7 + 4 + 2);
        assert!(!entry.is_directory());
    }

    #[test]
    fn test_cdfh_truncated_name() {
        let mut buf = b"PK\x01\x02".to_vec();
        buf.resize(CentralDirectoryEntry::SIZE, 0);
        buf[28..30].copy_from_slice(&10u16.to_le_bytes());
        buf.extend_from_slice(b"short");

        let err = CentralDirectoryEntry::from_bytes(&buf).unwrap_err();
        assert!(matches!(err, ZipError::OutOfBounds { .. }));
    }

    #[test]
    fn test_lfh_fields() {
        let mut buf = b"PK\x03\x04".to_vec();
        buf.resize(LocalFileHeader::SIZE, 0);
        buf[18..22].copy_from_slice(&5u32.to_le_bytes());
        buf[22..26].copy_from_slice(&9u32.to_le_bytes());
        buf[26..28].copy_from_slice(&3u16.to_le_bytes());
        buf[28..30].copy_from_slice(&28u16.to_le_bytes());

        let lfh = LocalFileHeader::from_bytes(&buf).unwrap();
        assert_eq!(lfh.compression_method, CompressionMethod::Stored);
        assert_eq!(lfh.compressed_size, 5);
        assert_eq!(lfh.uncompressed_size, 9);
        assert_eq!(lfh.file_name_len, 3);
        assert_eq!(lfh.extra_field_len, 28);
    }

    #[test]
    fn test_dos_timestamp() {
        let entry = CentralDirectoryEntry {
            file_name: "a".to_string(),
            file_name_len: 1,
            extra_field_len: 0,
            comment_len: 0,
            flags: 0,
            compression_method: CompressionMethod::Stored,
            // 2024-03-15 13:45:30
            last_mod_time: (13 << 11) | (45 << 5) | 15,
            last_mod_date: ((2024 - 1980) << 9) | (3 << 5) | 15,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            lfh_offset: 0,
        };
        assert_eq!(entry.mod_date(), (2024, 3, 15));
        assert_eq!(entry.mod_time(), (13, 45, 30));
    }
}
