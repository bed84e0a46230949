//! Error type shared across the filesystem decoder.

use std::fmt;
use std::io;

/// An error produced while decoding or walking a MINIX filesystem image.
#[derive(Debug)]
pub enum Error {
	/// A positioned read or write on the underlying image failed.
	Io(io::Error),
	/// An on-disk structure failed validation (bad signature, bad magic,
	/// wrong partition type, out-of-range inode number, ...).
	Format(String),
	/// A path could not be resolved against the directory tree.
	Resolution(String),
	/// The command-line arguments given to a front end were invalid.
	Argument(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io(e) => write!(f, "I/O error: {e}"),
			Self::Format(msg) => write!(f, "{msg}"),
			Self::Resolution(msg) => write!(f, "{msg}"),
			Self::Argument(msg) => write!(f, "{msg}"),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Self {
		Self::Io(e)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
