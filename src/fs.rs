//! Top-level filesystem context bundling a reader with its resolved
//! filesystem offset and decoded superblock.

use crate::dir::DirEntry;
use crate::error::{Error, Result};
use crate::inode::{self, Inode};
use crate::partition::{self, PartitionSelector};
use crate::path;
use crate::superblock::Superblock;
use crate::{dir, file};
use std::io::{Read, Seek, Write};

/// A read-only handle onto a MINIX V3 filesystem living somewhere inside
/// an image reader.
pub struct FsContext<R> {
	reader: R,
	fs_offset: u64,
	pub superblock: Superblock,
}

impl<R: Read + Seek> FsContext<R> {
	/// Opens a filesystem context by resolving `selector` against `reader`
	/// and decoding the superblock that follows.
	pub fn open(mut reader: R, selector: PartitionSelector) -> Result<Self> {
		let fs_offset = partition::resolve(&mut reader, selector)?;
		let superblock = Superblock::read(&mut reader, fs_offset)?;
		Ok(Self { reader, fs_offset, superblock })
	}

	/// Fetches the inode numbered `inum`.
	pub fn fetch_inode(&mut self, inum: u32) -> Result<Inode> {
		inode::fetch(&mut self.reader, self.fs_offset, &self.superblock, inum)
	}

	/// Canonicalizes and resolves `path` against the directory tree,
	/// returning the terminal inode and its number.
	pub fn resolve(&mut self, path: Option<&str>) -> Result<(u32, Inode)> {
		let canonical = path::canonicalize(path);
		path::resolve(&mut self.reader, self.fs_offset, &self.superblock, &canonical)
	}

	/// Enumerates every occupied entry of a directory inode.
	pub fn list_dir(&mut self, dir: &Inode, mut visit: impl FnMut(DirEntry)) -> Result<()> {
		if !dir.is_dir() {
			return Err(Error::Resolution("Not a directory.".to_string()));
		}
		dir::for_each_entry(&mut self.reader, self.fs_offset, &self.superblock, dir, |e| visit(e))
	}

	/// Writes the bytes of a regular-file inode to `out`.
	pub fn extract_file<W: Write>(&mut self, target: &Inode, out: &mut W) -> Result<()> {
		if !target.is_regular() {
			return Err(Error::Resolution("Not a regular file.".to_string()));
		}
		file::extract(&mut self.reader, self.fs_offset, &self.superblock, target, out)
	}
}
