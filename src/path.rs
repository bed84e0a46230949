//! Path canonicalization and directory-tree walking.

use crate::dir::lookup;
use crate::error::{Error, Result};
use crate::inode::{self, Inode};
use crate::superblock::Superblock;
use std::io::{Read, Seek};

/// Canonicalizes a path: `None`/empty become `"/"`, a leading `/` is
/// inserted if absent, runs of consecutive `/` collapse to one, and a
/// trailing `/` is stripped unless it would leave the string empty. No
/// `.`/`..` handling is performed.
pub fn canonicalize(path: Option<&str>) -> String {
	let path = match path {
		None => return "/".to_string(),
		Some(p) if p.is_empty() => return "/".to_string(),
		Some(p) => p,
	};

	let mut out = String::with_capacity(path.len() + 1);
	if !path.starts_with('/') {
		out.push('/');
	}
	let mut prev_slash = false;
	for c in path.chars() {
		if c == '/' {
			if prev_slash {
				continue;
			}
			prev_slash = true;
		} else {
			prev_slash = false;
		}
		out.push(c);
	}
	if out.len() > 1 && out.ends_with('/') {
		out.pop();
	}
	out
}

/// Walks the directory tree from the root inode, following a canonical
/// path's components. Returns the terminal inode along with its number.
pub fn resolve<R: Read + Seek>(
	reader: &mut R,
	fs_offset: u64,
	sb: &Superblock,
	canonical_path: &str,
) -> Result<(u32, Inode)> {
	let mut cur_num = inode::ROOT_INODE;
	let mut cur = inode::fetch(reader, fs_offset, sb, cur_num)?;

	for component in canonical_path.split('/').filter(|c| !c.is_empty()) {
		if !cur.is_dir() {
			return Err(Error::Resolution(format!(
				"{component}: not a directory."
			)));
		}
		match lookup(reader, fs_offset, sb, &cur, component)? {
			Some(child_num) => {
				cur_num = child_num;
				cur = inode::fetch(reader, fs_offset, sb, cur_num)?;
			}
			None => {
				return Err(Error::Resolution("File not found.".to_string()));
			}
		}
	}

	Ok((cur_num, cur))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn canonicalize_empty_and_none() {
		assert_eq!(canonicalize(None), "/");
		assert_eq!(canonicalize(Some("")), "/");
	}

	#[test]
	fn canonicalize_adds_leading_slash() {
		assert_eq!(canonicalize(Some("foo/bar")), "/foo/bar");
	}

	#[test]
	fn canonicalize_collapses_slashes_and_strips_trailing() {
		assert_eq!(canonicalize(Some("//foo//bar//")), "/foo/bar");
	}

	#[test]
	fn canonicalize_is_idempotent() {
		let once = canonicalize(Some("//a//b/c///"));
		let twice = canonicalize(Some(&once));
		assert_eq!(once, twice);
	}

	#[test]
	fn canonicalize_root_stays_root() {
		assert_eq!(canonicalize(Some("/")), "/");
	}
}
