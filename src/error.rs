//! Error types for the sandpile simulator.

use std::io;

use thiserror::Error;

/// Result type for sandpile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a session or writing its output.
///
/// Nothing in the stepping loop itself fails: overflowing work queues drop
/// pushes silently and lookups past the wedge simply find no cell.
#[derive(Debug, Error)]
pub enum Error {
	/// Width or height is zero.
	#[error("grid dimensions must be non-zero")]
	EmptyGrid,

	/// The wedge folding needs a square grid.
	#[error("grid must be square, got {width}x{height}")]
	NonSquare {
		width: usize,
		height: usize,
	},

	/// A work queue was configured to hold nothing.
	#[error("work queue capacity must be non-zero")]
	ZeroCapacity,

	/// Flushing every zero steps is meaningless.
	#[error("flush interval must be at least 1")]
	ZeroFlushInterval,

	/// Writing a rendered image failed.
	#[error("failed to write image: {0}")]
	Io(#[from] io::Error),
}
