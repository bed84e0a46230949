//! Inode fetching.

use crate::error::{Error, Result};
use crate::superblock::Superblock;
use std::io::{Read, Seek, SeekFrom};

/// Size in bytes of an on-disk inode record.
pub const INODE_SIZE: u64 = 64;

/// Inode number of the filesystem root.
pub const ROOT_INODE: u32 = 1;

/// File type bits within `mode` (the `S_IFMT` mask).
const S_IFMT: u16 = 0o170000;
pub const S_IFDIR: u16 = 0o040000;
pub const S_IFREG: u16 = 0o100000;

/// A decoded MINIX V3 inode.
#[derive(Debug, Clone, Copy)]
pub struct Inode {
	pub mode: u16,
	pub links: u16,
	pub uid: u16,
	pub gid: u16,
	pub size: u32,
	pub atime: i32,
	pub mtime: i32,
	pub ctime: i32,
	pub zone: [u32; 7],
	pub indirect: u32,
	pub two_indirect: u32,
}

impl Inode {
	fn parse(buf: &[u8; INODE_SIZE as usize]) -> Self {
		let mut zone = [0u32; 7];
		for (i, z) in zone.iter_mut().enumerate() {
			let off = 24 + i * 4;
			*z = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
		}
		Self {
			mode: u16::from_le_bytes(buf[0..2].try_into().unwrap()),
			links: u16::from_le_bytes(buf[2..4].try_into().unwrap()),
			uid: u16::from_le_bytes(buf[4..6].try_into().unwrap()),
			gid: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
			size: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
			atime: i32::from_le_bytes(buf[12..16].try_into().unwrap()),
			mtime: i32::from_le_bytes(buf[16..20].try_into().unwrap()),
			ctime: i32::from_le_bytes(buf[20..24].try_into().unwrap()),
			zone,
			indirect: u32::from_le_bytes(buf[52..56].try_into().unwrap()),
			two_indirect: u32::from_le_bytes(buf[56..60].try_into().unwrap()),
		}
	}

	pub fn is_dir(&self) -> bool {
		self.mode & S_IFMT == S_IFDIR
	}

	pub fn is_regular(&self) -> bool {
		self.mode & S_IFMT == S_IFREG
	}

	/// Renders the `ls`-style ten character permission string, e.g.
	/// `drwxr-xr-x`.
	pub fn permission_string(&self) -> String {
		let mut s = String::with_capacity(10);
		s.push(if self.is_dir() { 'd' } else { '-' });
		let bits = [
			(0o400, 'r'), (0o200, 'w'), (0o100, 'x'),
			(0o040, 'r'), (0o020, 'w'), (0o010, 'x'),
			(0o004, 'r'), (0o002, 'w'), (0o001, 'x'),
		];
		for (mask, ch) in bits {
			s.push(if self.mode & mask != 0 { ch } else { '-' });
		}
		s
	}
}

/// Fetches the inode numbered `inum` (1-based).
pub fn fetch<R: Read + Seek>(
	reader: &mut R,
	fs_offset: u64,
	sb: &Superblock,
	inum: u32,
) -> Result<Inode> {
	if inum == 0 || inum > sb.ninodes {
		return Err(Error::Format(format!(
			"Invalid inode number {inum}: must be in 1..={}.",
			sb.ninodes
		)));
	}

	let table_byte = fs_offset
		+ sb.inode_table_block() * sb.blocksize as u64
		+ (inum as u64 - 1) * INODE_SIZE;

	let mut buf = [0u8; INODE_SIZE as usize];
	reader.seek(SeekFrom::Start(table_byte))?;
	reader.read_exact(&mut buf)?;

	Ok(Inode::parse(&buf))
}
