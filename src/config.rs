//! Session configuration.

use crate::{lattice::wedge_cells, Error, Grains, Result};

/// Setup parameters of a simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
	pub width: usize,
	pub height: usize,
	/// Grains placed on the center cell before the first step.
	pub grains: Grains,
	/// Capacity of each work queue. `None` sizes the queues to the wedge, which
	/// is about `width * height / 8` and can never overflow.
	pub queue_capacity: Option<usize>,
	/// Steps between renderer flushes at startup.
	pub flush_interval: usize,
	/// Interval used by the fast speed of [`Session::toggle_speed`](crate::Session::toggle_speed).
	pub fast_flush_interval: usize,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			width: 320,
			height: 320,
			grains: 10_000_000,
			queue_capacity: None,
			flush_interval: 1,
			fast_flush_interval: 100,
		}
	}
}

impl SimConfig {
	/// Square grid of the given side with everything else defaulted.
	pub fn square(size: usize, grains: Grains) -> Self {
		Self {
			width: size,
			height: size,
			grains,
			..Self::default()
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.width == 0 || self.height == 0 {
			return Err(Error::EmptyGrid);
		}
		if self.width != self.height {
			return Err(Error::NonSquare {
				width: self.width,
				height: self.height,
			});
		}
		if self.queue_capacity == Some(0) {
			return Err(Error::ZeroCapacity);
		}
		if self.flush_interval == 0 || self.fast_flush_interval == 0 {
			return Err(Error::ZeroFlushInterval);
		}
		Ok(())
	}

	pub fn capacity(&self) -> usize {
		self.queue_capacity.unwrap_or_else(|| wedge_cells(self.width / 2))
	}
}
