//! File byte materialization: walks an inode's zones and writes its bytes,
//! zero-filling sparse holes, truncated to the inode's recorded size.

use crate::error::{Error, Result};
use crate::inode::Inode;
use crate::superblock::Superblock;
use crate::zone::ZoneWalker;
use std::io::{Read, Seek, Write};

/// Size of the transient copy buffer used for non-hole zones.
const COPY_CHUNK: usize = 4096;

/// Writes the bytes of a regular-file inode to `out`, zero-filling holes.
/// Fails if the inode's zone pointers cannot address its entire recorded
/// size.
pub fn extract<R: Read + Seek, W: Write>(
	reader: &mut R,
	fs_offset: u64,
	sb: &Superblock,
	file: &Inode,
	out: &mut W,
) -> Result<()> {
	let zonesize = sb.zonesize();
	let mut remaining = file.size as u64;
	let mut k = 0u64;
	let mut walker = ZoneWalker::new(reader, fs_offset, sb, file);
	let zero_buf = vec![0u8; zonesize.min(COPY_CHUNK as u64).max(1) as usize];

	while remaining > 0 {
		let zone_num = match walker.zone_for(k)? {
			Some(z) => z,
			None => {
				return Err(Error::Format(format!(
					"File extends beyond the addressable zone range with {remaining} byte(s) unreachable."
				)));
			}
		};
		let chunk = remaining.min(zonesize);

		if zone_num == 0 {
			write_zeros(out, chunk, &zero_buf)?;
		} else {
			copy_zone(&mut walker, fs_offset + zone_num as u64 * zonesize, chunk, out)?;
		}

		remaining -= chunk;
		k += 1;
	}

	Ok(())
}

fn write_zeros<W: Write>(out: &mut W, mut remaining: u64, zero_buf: &[u8]) -> Result<()> {
	while remaining > 0 {
		let n = remaining.min(zero_buf.len() as u64) as usize;
		out.write_all(&zero_buf[..n])?;
		remaining -= n as u64;
	}
	Ok(())
}

fn copy_zone<R: Read + Seek, W: Write>(
	walker: &mut ZoneWalker<'_, R>,
	start: u64,
	mut remaining: u64,
	out: &mut W,
) -> Result<()> {
	let mut buf = vec![0u8; remaining.min(COPY_CHUNK as u64) as usize];
	let mut offset = start;
	while remaining > 0 {
		let n = remaining.min(buf.len() as u64) as usize;
		walker.seek_read(offset, &mut buf[..n])?;
		out.write_all(&buf[..n])?;
		offset += n as u64;
		remaining -= n as u64;
	}
	Ok(())
}
