//! Superblock decoding.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// Byte offset of the superblock from the start of the filesystem.
pub const SUPERBLOCK_OFFSET: u64 = 1024;

/// Size in bytes of the on-disk superblock record.
const SUPERBLOCK_SIZE: usize = 32;

/// Expected magic value of a MINIX V3 superblock.
pub const MAGIC: i16 = 0x4D5A;

/// The decoded MINIX V3 superblock.
#[derive(Debug, Clone, Copy)]
pub struct Superblock {
	pub ninodes: u32,
	/// Number of blocks occupied by the inode bitmap.
	pub i_blocks: i16,
	/// Number of blocks occupied by the zone bitmap.
	pub z_blocks: i16,
	pub firstdata: u16,
	pub log_zone_size: i16,
	pub max_file: u32,
	pub zones: u32,
	pub magic: i16,
	pub blocksize: u16,
	pub subversion: u8,
}

impl Superblock {
	/// Reads and validates the superblock at `fs_offset + 1024`.
	pub fn read<R: Read + Seek>(reader: &mut R, fs_offset: u64) -> Result<Self> {
		let mut buf = [0u8; SUPERBLOCK_SIZE];
		reader.seek(SeekFrom::Start(fs_offset + SUPERBLOCK_OFFSET))?;
		reader.read_exact(&mut buf)?;

		let ninodes = u32::from_le_bytes(buf[0..4].try_into().unwrap());
		// buf[4..6] is a reserved field.
		let i_blocks = i16::from_le_bytes(buf[6..8].try_into().unwrap());
		let z_blocks = i16::from_le_bytes(buf[8..10].try_into().unwrap());
		let firstdata = u16::from_le_bytes(buf[10..12].try_into().unwrap());
		let log_zone_size = i16::from_le_bytes(buf[12..14].try_into().unwrap());
		// buf[14..16] is a reserved field.
		let max_file = u32::from_le_bytes(buf[16..20].try_into().unwrap());
		let zones = u32::from_le_bytes(buf[20..24].try_into().unwrap());
		let magic = i16::from_le_bytes(buf[24..26].try_into().unwrap());
		// buf[26..28] is a reserved field.
		let blocksize = u16::from_le_bytes(buf[28..30].try_into().unwrap());
		let subversion = buf[30];

		if magic != MAGIC {
			return Err(Error::Format(format!(
				"Bad magic number: expected 0x{MAGIC:04x}, found 0x{magic:04x}."
			)));
		}

		Ok(Self {
			ninodes,
			i_blocks,
			z_blocks,
			firstdata,
			log_zone_size,
			max_file,
			zones,
			magic,
			blocksize,
			subversion,
		})
	}

	/// Size in bytes of a zone: `blocksize << log_zone_size`.
	pub fn zonesize(&self) -> u64 {
		(self.blocksize as u64) << self.log_zone_size
	}

	/// Block index (not zone index) at which the inode table begins.
	pub fn inode_table_block(&self) -> u64 {
		2 + self.i_blocks as u64 + self.z_blocks as u64
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Cursor;

	fn encode(ninodes: u32, i_blocks: i16, z_blocks: i16, log_zone_size: i16, magic: i16, blocksize: u16) -> Vec<u8> {
		let mut buf = vec![0u8; 1024 + 32];
		let sb = &mut buf[1024..1056];
		sb[0..4].copy_from_slice(&ninodes.to_le_bytes());
		sb[6..8].copy_from_slice(&i_blocks.to_le_bytes());
		sb[8..10].copy_from_slice(&z_blocks.to_le_bytes());
		sb[12..14].copy_from_slice(&log_zone_size.to_le_bytes());
		sb[24..26].copy_from_slice(&magic.to_le_bytes());
		sb[28..30].copy_from_slice(&blocksize.to_le_bytes());
		buf
	}

	#[test]
	fn decodes_valid_superblock() {
		let buf = encode(100, 1, 2, 0, MAGIC, 1024);
		let mut img = Cursor::new(buf);
		let sb = Superblock::read(&mut img, 0).unwrap();
		assert_eq!(sb.ninodes, 100);
		assert_eq!(sb.blocksize, 1024);
		assert_eq!(sb.zonesize(), 1024);
		assert_eq!(sb.inode_table_block(), 5);
	}

	#[test]
	fn rejects_bad_magic() {
		let buf = encode(100, 1, 2, 0, 0x1234, 1024);
		let mut img = Cursor::new(buf);
		assert!(Superblock::read(&mut img, 0).is_err());
	}

	#[test]
	fn zonesize_scales_with_log_zone_size() {
		let buf = encode(100, 1, 2, 1, MAGIC, 1024);
		let mut img = Cursor::new(buf);
		let sb = Superblock::read(&mut img, 0).unwrap();
		assert_eq!(sb.zonesize(), 2048);
	}

	#[test]
	fn honors_filesystem_offset() {
		let mut base = vec![0u8; 512];
		base.extend(encode(10, 1, 1, 0, MAGIC, 1024));
		let mut img = Cursor::new(base);
		let sb = Superblock::read(&mut img, 512).unwrap();
		assert_eq!(sb.ninodes, 10);
	}
}
