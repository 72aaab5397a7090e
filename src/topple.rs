//! Toppling on the wedge.
//!
//! Only one eighth of the grid exists, so a topple has to deliver what the
//! whole orbit of the toppling cell would deliver in the unfolded grid. A
//! wedge neighbour `R` of the toppling cell `S` receives one grain for each of
//! `R`'s own grid neighbours that is a mirror image of `S`. In-wedge
//! neighbours therefore get 1 (regular), 1 or 2 (edge), or 4 (center), and
//! neighbours that fall outside the wedge get nothing; their share already
//! arrived through the mirror.

use crate::{
	active::ActiveSet,
	lattice::{fold, Lattice},
	Grains, THRESHOLD,
};

const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Grains the wedge cell at relative `target` gains from one topple of the
/// wedge cell at relative `source`.
pub fn weight(source: (u64, u64), target: (i64, i64)) -> Grains {
	let (p, q) = target;
	NEIGHBOURS
		.iter()
		.filter(|(dp, dq)| fold(p + dp, q + dq) == source)
		.count() as Grains
}

/// Topples the cell at `index` once: takes four grains from its staged value
/// and hands them to the wedge neighbours, scheduling every touched cell.
///
/// Returns the grid-wide grains that left over the grid boundary.
pub fn topple(lattice: &mut Lattice, active: &mut ActiveSet, index: usize) -> Grains {
	let m = lattice.middle() as i64;
	let (source, given) = {
		let cell = lattice.cell_mut(index);
		debug_assert!(cell.current >= THRESHOLD, "topple below threshold at {:?}", cell.position());
		cell.next -= THRESHOLD;
		let a = m - cell.x as i64;
		let b = m - cell.y as i64;
		((a, b), cell.classification.multiplicity() * THRESHOLD)
	};
	let (a, b) = source;
	let mut received = 0;
	for (da, db) in NEIGHBOURS.iter() {
		let target = (a + da, b + db);
		if let Some(t) = lattice.index_rel(target.0, target.1) {
			let w = weight((a as u64, b as u64), target);
			let cell = lattice.cell_mut(t);
			cell.next += w;
			received += w * cell.classification.multiplicity();
			active.enqueue_if_absent(lattice, t);
		}
	}
	active.enqueue_if_absent(lattice, index);
	given - received
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Classification;

	fn loaded(size: usize, x: usize, y: usize, grains: Grains) -> (Lattice, ActiveSet, usize) {
		let mut lattice = Lattice::new(size);
		let i = lattice.index_of(x, y).unwrap();
		let cell = lattice.cell_mut(i);
		cell.current = grains;
		cell.next = grains;
		(lattice, ActiveSet::new(64), i)
	}

	fn nexts(lattice: &Lattice) -> Vec<((usize, usize), Grains)> {
		lattice
			.cells()
			.filter(|c| c.next > 0)
			.map(|c| (c.position(), c.next))
			.collect()
	}

	#[test]
	fn weights_from_the_symmetry_group() {
		// center to the first axis cell: all four directions fold onto it
		assert_eq!(weight((0, 1), (0, 0)), 4);
		assert_eq!(weight((0, 0), (0, 1)), 1);
		// axis edge: along the axis once, across it from both sides
		assert_eq!(weight((0, 2), (0, 3)), 1);
		assert_eq!(weight((1, 3), (0, 3)), 2);
		// diagonal edge is reached from both halves
		assert_eq!(weight((2, 3), (3, 3)), 2);
		assert_eq!(weight((2, 2), (2, 3)), 1);
		assert_eq!(weight((1, 1), (0, 1)), 2);
		// regular
		assert_eq!(weight((1, 3), (2, 3)), 1);
		assert_eq!(weight((1, 4), (1, 3)), 1);
	}

	#[test]
	fn center_topple_feeds_the_axis() {
		let (mut lattice, mut active, i) = loaded(5, 2, 2, 4);
		let lost = topple(&mut lattice, &mut active, i);
		assert_eq!(lost, 0);
		assert_eq!(nexts(&lattice), vec![((2, 1), 1)]);
		assert_eq!(lattice.mass(|c| c.next), 4);
		assert_eq!(active.pending().len(), 2);
	}

	#[test]
	fn axis_edge_topple() {
		let (mut lattice, mut active, i) = loaded(11, 5, 4, 4);
		assert_eq!(lattice.cell(i).classification, Classification::Edge);
		topple(&mut lattice, &mut active, i);
		assert_eq!(lattice.cell(i).next, 0);
		assert_eq!(lattice.get(5, 5).unwrap().next, 4);
		assert_eq!(lattice.get(5, 3).unwrap().next, 1);
		assert_eq!(lattice.get(4, 4).unwrap().next, 2);
		assert_eq!(lattice.mass(|c| c.next), 16);
	}

	#[test]
	fn diagonal_edge_topple() {
		let (mut lattice, mut active, i) = loaded(11, 3, 3, 4);
		assert_eq!(lattice.cell(i).classification, Classification::Edge);
		topple(&mut lattice, &mut active, i);
		assert_eq!(nexts(&lattice), vec![((4, 3), 1), ((3, 2), 1)]);
		assert_eq!(lattice.mass(|c| c.next), 16);
	}

	#[test]
	fn regular_topple() {
		let (mut lattice, mut active, i) = loaded(11, 4, 2, 5);
		assert_eq!(lattice.cell(i).classification, Classification::Regular);
		topple(&mut lattice, &mut active, i);
		assert_eq!(lattice.cell(i).next, 1);
		for (x, y) in [(3, 2), (4, 1), (4, 3)] {
			assert_eq!(lattice.get(x, y).unwrap().next, 1, "at ({}, {})", x, y);
		}
		// the axis also collects the grain of the mirrored neighbour
		assert_eq!(lattice.get(5, 2).unwrap().next, 2);
		assert_eq!(lattice.mass(|c| c.next), 40);
		assert_eq!(active.pending().len(), 5);
	}

	#[test]
	fn boundary_topple_loses_grains() {
		let (mut lattice, mut active, i) = loaded(5, 2, 0, 4);
		let lost = topple(&mut lattice, &mut active, i);
		assert_eq!(lost, 4);
		assert_eq!(lattice.mass(|c| c.next) + lost, 16);
	}

	#[test]
	fn mass_is_conserved_for_every_interior_cell() {
		let size = 21;
		let interior: Vec<_> = Lattice::new(size)
			.cells()
			.filter(|c| c.y > 0)
			.map(|c| c.position())
			.collect();
		for (x, y) in interior {
			let (mut lattice, mut active, i) = loaded(size, x, y, 4);
			let before = lattice.mass(|c| c.next);
			let lost = topple(&mut lattice, &mut active, i);
			assert_eq!(lost, 0, "at ({}, {})", x, y);
			assert_eq!(lattice.mass(|c| c.next), before, "at ({}, {})", x, y);
		}
	}
}
