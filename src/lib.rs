//! Read-only decoder for MINIX V3 filesystem images.
//!
//! Consumes any `Read + Seek` byte source (a file, a block device, or an
//! in-memory buffer), optionally nested inside an MBR partition and
//! subpartition, and exposes directory listing and file extraction on top
//! of it.

pub mod dir;
pub mod error;
pub mod file;
pub mod fs;
pub mod inode;
pub mod partition;
pub mod path;
pub mod superblock;
pub mod zone;

pub use error::{Error, Result};
pub use fs::FsContext;
pub use partition::PartitionSelector;
