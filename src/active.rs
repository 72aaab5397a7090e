//! The active set: which cells to examine this step, which next step, and
//! which to hand to the renderer.
//!
//! Toppling stages values in [`Cell::next`](crate::Cell::next);
//! [`ActiveSet::begin_step`] promotes them to `current` for every queued cell
//! at once, so all topples of a step read the same "before" state.

use crate::{lattice::Lattice, queue::WorkQueue, THRESHOLD};

#[derive(Debug, Clone)]
pub struct ActiveSet {
	checking: WorkQueue,
	pending: WorkQueue,
	dirty: WorkQueue,
}

impl ActiveSet {
	pub fn new(capacity: usize) -> ActiveSet {
		ActiveSet {
			checking: WorkQueue::new("checking", capacity),
			pending: WorkQueue::new("pending", capacity),
			dirty: WorkQueue::new("dirty", capacity),
		}
	}

	/// Schedules `index` for the next step unless it is already scheduled.
	pub fn enqueue_if_absent(&mut self, lattice: &mut Lattice, index: usize) {
		let cell = lattice.cell_mut(index);
		if !cell.queued_for_check && self.pending.push(index) {
			cell.queued_for_check = true;
		}
	}

	/// Queues `index` for projection unless it is already queued.
	pub fn mark_dirty(&mut self, lattice: &mut Lattice, index: usize) {
		let cell = lattice.cell_mut(index);
		if !cell.pending_render && self.dirty.push(index) {
			cell.pending_render = true;
		}
	}

	/// Moves the pending cells into `checking` and commits their staged values.
	/// Returns whether any of them changed.
	pub fn begin_step(&mut self, lattice: &mut Lattice) -> bool {
		std::mem::swap(&mut self.checking, &mut self.pending);
		self.pending.clear();
		let mut changed = false;
		for index in self.checking.iter() {
			let cell = lattice.cell_mut(index);
			cell.queued_for_check = false;
			if cell.next == cell.current {
				continue;
			}
			changed = true;
			cell.current = cell.next;
			// values at or above the threshold only exist until the next topple
			if cell.current < THRESHOLD && !cell.pending_render && self.dirty.push(index) {
				cell.pending_render = true;
			}
		}
		changed
	}

	/// Empties the dirty queue, clearing each cell's render flag.
	pub fn drain_dirty(&mut self, lattice: &mut Lattice, mut f: impl FnMut(&Lattice, usize)) {
		for index in self.dirty.iter() {
			f(lattice, index);
			lattice.cell_mut(index).pending_render = false;
		}
		self.dirty.clear();
	}

	pub fn checking(&self) -> &WorkQueue {
		&self.checking
	}

	pub fn pending(&self) -> &WorkQueue {
		&self.pending
	}

	pub fn dirty(&self) -> &WorkQueue {
		&self.dirty
	}

	/// Pushes dropped by any of the three queues.
	pub fn dropped(&self) -> u64 {
		self.checking.dropped() + self.pending.dropped() + self.dirty.dropped()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn enqueue_is_idempotent() {
		let mut lattice = Lattice::new(9);
		let mut active = ActiveSet::new(16);
		let i = lattice.index_of(4, 2).unwrap();
		active.enqueue_if_absent(&mut lattice, i);
		active.enqueue_if_absent(&mut lattice, i);
		assert_eq!(active.pending().as_slice(), &[i]);
		assert!(lattice.cell(i).queued_for_check);
	}

	#[test]
	fn begin_step_commits_and_marks_dirty() {
		let mut lattice = Lattice::new(9);
		let mut active = ActiveSet::new(16);
		let low = lattice.index_of(4, 3).unwrap();
		let high = lattice.index_of(3, 3).unwrap();
		lattice.cell_mut(low).next = 2;
		lattice.cell_mut(high).next = 6;
		active.enqueue_if_absent(&mut lattice, low);
		active.enqueue_if_absent(&mut lattice, high);

		assert!(active.begin_step(&mut lattice));
		assert_eq!(active.checking().as_slice(), &[low, high]);
		assert!(active.pending().is_empty());
		assert_eq!(lattice.cell(low).current, 2);
		assert_eq!(lattice.cell(high).current, 6);
		assert!(!lattice.cell(low).queued_for_check);
		// the overloaded cell is about to topple and is not worth drawing
		assert_eq!(active.dirty().as_slice(), &[low]);
		assert!(lattice.cell(low).pending_render);
		assert!(!lattice.cell(high).pending_render);
	}

	#[test]
	fn begin_step_without_changes_reports_none() {
		let mut lattice = Lattice::new(5);
		let mut active = ActiveSet::new(4);
		assert!(!active.begin_step(&mut lattice));
		active.enqueue_if_absent(&mut lattice, Lattice::CENTER);
		assert!(!active.begin_step(&mut lattice));
		assert!(active.dirty().is_empty());
	}

	#[test]
	fn dirty_cells_are_queued_once_until_drained() {
		let mut lattice = Lattice::new(5);
		let mut active = ActiveSet::new(4);
		for value in [1, 2] {
			lattice.cell_mut(Lattice::CENTER).next = value;
			active.enqueue_if_absent(&mut lattice, Lattice::CENTER);
			active.begin_step(&mut lattice);
		}
		assert_eq!(active.dirty().len(), 1);
		let mut seen = Vec::new();
		active.drain_dirty(&mut lattice, |l, i| seen.push(l.cell(i).current));
		assert_eq!(seen, vec![2]);
		assert!(active.dirty().is_empty());
		assert!(!lattice.center().pending_render);
	}

	#[test]
	fn full_queue_leaves_flag_clear() {
		let mut lattice = Lattice::new(9);
		let mut active = ActiveSet::new(1);
		let a = lattice.index_of(4, 3).unwrap();
		let b = lattice.index_of(4, 2).unwrap();
		active.enqueue_if_absent(&mut lattice, a);
		active.enqueue_if_absent(&mut lattice, b);
		assert_eq!(active.pending().len(), 1);
		assert!(!lattice.cell(b).queued_for_check);
		assert_eq!(active.dropped(), 1);
	}
}
