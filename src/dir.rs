//! Directory entry scanning.

use crate::error::Result;
use crate::inode::Inode;
use crate::superblock::Superblock;
use crate::zone::ZoneWalker;
use std::io::{Read, Seek};

/// Size in bytes of a directory entry record.
pub const ENTRY_SIZE: u64 = 64;
/// Size in bytes of the name field within a directory entry.
const NAME_SIZE: usize = 60;

/// A single decoded directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
	pub inode: u32,
	pub name: String,
}

fn decode_name(raw: &[u8; NAME_SIZE]) -> String {
	let end = raw.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);
	String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Visits every occupied entry of a directory inode, in on-disk order.
pub fn for_each_entry<R: Read + Seek>(
	reader: &mut R,
	fs_offset: u64,
	sb: &Superblock,
	dir: &Inode,
	mut visit: impl FnMut(DirEntry),
) -> Result<()> {
	let zonesize = sb.zonesize();
	let mut remaining = dir.size as u64;
	let mut k = 0u64;
	let mut walker = ZoneWalker::new(reader, fs_offset, sb, dir);

	while remaining > 0 {
		let zone_num = match walker.zone_for(k)? {
			Some(z) => z,
			None => break,
		};
		let chunk = remaining.min(zonesize);

		if zone_num == 0 {
			// A hole inside a directory's backing storage cannot contain
			// entries; skip it.
			remaining -= chunk;
			k += 1;
			continue;
		}

		let mut buf = vec![0u8; chunk as usize];
		walker.seek_read(fs_offset + zone_num as u64 * zonesize, &mut buf)?;

		let whole_entries = buf.len() / ENTRY_SIZE as usize;
		for i in 0..whole_entries {
			let off = i * ENTRY_SIZE as usize;
			let inum = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
			if inum == 0 {
				continue;
			}
			let mut name = [0u8; NAME_SIZE];
			name.copy_from_slice(&buf[off + 4..off + 4 + NAME_SIZE]);
			visit(DirEntry { inode: inum, name: decode_name(&name) });
		}

		remaining -= chunk;
		k += 1;
	}

	Ok(())
}

/// Looks up a single name within a directory inode, returning its inode
/// number if found.
pub fn lookup<R: Read + Seek>(
	reader: &mut R,
	fs_offset: u64,
	sb: &Superblock,
	dir: &Inode,
	target: &str,
) -> Result<Option<u32>> {
	let mut found = None;
	for_each_entry(reader, fs_offset, sb, dir, |entry| {
		if found.is_none() && entry.name == target {
			found = Some(entry.inode);
		}
	})?;
	Ok(found)
}
