//! MBR partition table resolution.
//!
//! Locates the absolute byte offset at which a MINIX filesystem begins,
//! optionally descending through one primary partition and one nested
//! subpartition. Decoding is done by slicing fixed-size buffers and
//! reassembling integers rather than by reinterpreting raw memory, so the
//! layout below stays explicit about field widths and offsets.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// Size in bytes of a disk sector, matching the `lFirst`/`size` units used
/// by the on-disk partition entries.
pub const SECTOR_SIZE: u64 = 512;

/// Byte offset of the partition table within a boot sector.
const TABLE_OFFSET: u64 = 0x1BE;

/// Partition type byte identifying a MINIX partition.
const MINIX_PARTITION_TYPE: u8 = 0x81;

/// A single 16-byte MBR partition table entry.
#[derive(Debug, Clone, Copy)]
pub struct PartitionEntry {
	pub bootable: u8,
	pub part_type: u8,
	/// Absolute LBA (in sectors) of the first sector of the partition.
	pub l_first: u32,
	/// Size of the partition in sectors.
	pub size: u32,
}

impl PartitionEntry {
	fn parse(buf: &[u8; 16]) -> Self {
		Self {
			bootable: buf[0],
			part_type: buf[4],
			l_first: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
			size: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
		}
	}
}

/// Which partition (and, optionally, subpartition) to resolve the
/// filesystem from.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionSelector {
	pub primary: Option<u8>,
	pub sub: Option<u8>,
}

fn check_boot_signature<R: Read + Seek>(reader: &mut R, sector_start: u64) -> Result<()> {
	let mut sig = [0u8; 2];
	reader.seek(SeekFrom::Start(sector_start + 510))?;
	reader.read_exact(&mut sig)?;
	if sig != [0x55, 0xAA] {
		return Err(Error::Format(format!(
			"Invalid boot sector signature at byte {sector_start}."
		)));
	}
	Ok(())
}

fn read_entry<R: Read + Seek>(reader: &mut R, table_start: u64, index: u8) -> Result<PartitionEntry> {
	if index >= 4 {
		return Err(Error::Argument(format!(
			"Invalid partition index {index}: must be in 0..4."
		)));
	}
	let mut buf = [0u8; 16];
	reader.seek(SeekFrom::Start(table_start + TABLE_OFFSET + 16 * index as u64))?;
	reader.read_exact(&mut buf)?;
	Ok(PartitionEntry::parse(&buf))
}

/// Resolves a partition selector to the absolute byte offset at which the
/// filesystem begins.
pub fn resolve<R: Read + Seek>(reader: &mut R, selector: PartitionSelector) -> Result<u64> {
	let Some(primary) = selector.primary else {
		return Ok(0);
	};

	check_boot_signature(reader, 0)?;
	let primary_entry = read_entry(reader, 0, primary)?;
	if primary_entry.part_type != MINIX_PARTITION_TYPE {
		return Err(Error::Format(format!(
			"Partition {primary} is not a MINIX partition (type 0x{:02x}).",
			primary_entry.part_type
		)));
	}
	let primary_offset = primary_entry.l_first as u64 * SECTOR_SIZE;

	let Some(sub) = selector.sub else {
		return Ok(primary_offset);
	};

	check_boot_signature(reader, primary_offset)?;
	let sub_entry = read_entry(reader, primary_offset, sub)?;
	if sub_entry.part_type != MINIX_PARTITION_TYPE {
		return Err(Error::Format(format!(
			"Subpartition {sub} is not a MINIX partition (type 0x{:02x}).",
			sub_entry.part_type
		)));
	}
	// A subpartition's lFirst is an absolute LBA from the start of the
	// disk, not relative to the primary partition.
	Ok(sub_entry.l_first as u64 * SECTOR_SIZE)
}
