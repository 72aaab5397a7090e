//! Fixed-capacity work queue of cell indices.

use tracing::warn;

/// Append-only list of lattice indices that is cleared, never shrunk, between
/// uses. Pushes past the capacity are dropped and counted.
#[derive(Debug, Clone)]
pub struct WorkQueue {
	name: &'static str,
	items: Vec<usize>,
	capacity: usize,
	dropped: u64,
}

impl WorkQueue {
	pub fn new(name: &'static str, capacity: usize) -> WorkQueue {
		WorkQueue {
			name,
			items: Vec::with_capacity(capacity),
			capacity,
			dropped: 0,
		}
	}

	/// Returns false if the queue was full and `index` was dropped.
	pub fn push(&mut self, index: usize) -> bool {
		if self.items.len() < self.capacity {
			self.items.push(index);
			return true;
		}
		if self.dropped == 0 {
			warn!(queue = self.name, capacity = self.capacity, "work queue full, dropping cells");
		}
		self.dropped += 1;
		false
	}

	pub fn clear(&mut self) {
		self.items.clear();
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Pushes dropped over the queue's lifetime.
	pub fn dropped(&self) -> u64 {
		self.dropped
	}

	pub fn as_slice(&self) -> &[usize] {
		&self.items
	}

	pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
		self.items.iter().copied()
	}
}
