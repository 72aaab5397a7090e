//! Cell storage for the one-eighth wedge of a square grid.
//!
//! With `m` the middle row and column, a grid cell `(x, y)` has relative
//! coordinates `a = m - x`, `b = m - y`. The wedge is `0 <= a <= b <= m`:
//! it runs from the middle up to row 0, bounded by the vertical ray through
//! the middle (`a = 0`) and the diagonal (`a = b`). Every other cell of the
//! grid is a mirror image of exactly one wedge cell.
//!
//! Storage is triangular, row `b` holding `b + 1` cells.

use crate::Grains;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
	/// The apex, fixed by all eight symmetries.
	Center,
	/// Strictly between the two bounding rays.
	Regular,
	/// On a bounding ray, apex excluded.
	Edge,
	/// Not in the wedge or not on the grid.
	Outside,
}

impl Classification {
	/// Number of grid cells the wedge cell stands for.
	pub fn multiplicity(self) -> Grains {
		match self {
			Classification::Center => 1,
			Classification::Edge => 4,
			Classification::Regular => 8,
			Classification::Outside => 0,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
	pub x: usize,
	pub y: usize,
	/// Value committed at the last step boundary.
	pub current: Grains,
	/// Value being accumulated during the step in flight.
	pub next: Grains,
	/// Set while the cell sits in the pending queue.
	pub queued_for_check: bool,
	/// Set while the cell sits in the dirty queue.
	pub pending_render: bool,
	pub classification: Classification,
}

impl Cell {
	pub fn position(&self) -> (usize, usize) {
		(self.x, self.y)
	}
}

/// Number of cells in a wedge whose apex is `middle` rows from row 0.
pub fn wedge_cells(middle: usize) -> usize {
	(middle + 1) * (middle + 2) / 2
}

/// Wedge representative `(a, b)` of any relative offset `(p, q)`.
pub fn fold(p: i64, q: i64) -> (u64, u64) {
	let (p, q) = (p.unsigned_abs(), q.unsigned_abs());
	if p <= q {
		(p, q)
	} else {
		(q, p)
	}
}

#[derive(Debug, Clone)]
pub struct Lattice {
	size: usize,
	middle: usize,
	cells: Vec<Cell>,
}

impl Lattice {
	/// Index of the center cell.
	pub const CENTER: usize = 0;

	pub fn new(size: usize) -> Lattice {
		let middle = size / 2;
		let mut cells = Vec::with_capacity(wedge_cells(middle));
		for b in 0..=middle {
			for a in 0..=b {
				let classification = if b == 0 {
					Classification::Center
				} else if a == 0 || a == b {
					Classification::Edge
				} else {
					Classification::Regular
				};
				cells.push(Cell {
					x: middle - a,
					y: middle - b,
					current: 0,
					next: 0,
					queued_for_check: false,
					pending_render: false,
					classification,
				});
			}
		}
		Lattice {
			size,
			middle,
			cells,
		}
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn middle(&self) -> usize {
		self.middle
	}

	pub fn len(&self) -> usize {
		self.cells.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	pub fn classify(&self, x: usize, y: usize) -> Classification {
		self.index_of(x, y)
			.map_or(Classification::Outside, |i| self.cells[i].classification)
	}

	/// Relative wedge coordinates of a grid position, if it lies in the wedge.
	pub fn relative(&self, x: usize, y: usize) -> Option<(usize, usize)> {
		if x >= self.size || y >= self.size || x > self.middle || y > x {
			return None;
		}
		Some((self.middle - x, self.middle - y))
	}

	pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
		self.relative(x, y).map(|(a, b)| b * (b + 1) / 2 + a)
	}

	/// Index of the cell at relative offset `(a, b)`, without folding.
	pub fn index_rel(&self, a: i64, b: i64) -> Option<usize> {
		if a < 0 || a > b || b > self.middle as i64 {
			return None;
		}
		let (a, b) = (a as usize, b as usize);
		Some(b * (b + 1) / 2 + a)
	}

	pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
		let i = self.index_of(x, y)?;
		Some(&self.cells[i])
	}

	pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
		let i = self.index_of(x, y)?;
		Some(&mut self.cells[i])
	}

	pub fn cell(&self, index: usize) -> &Cell {
		&self.cells[index]
	}

	pub fn cell_mut(&mut self, index: usize) -> &mut Cell {
		&mut self.cells[index]
	}

	pub fn center(&self) -> &Cell {
		&self.cells[Self::CENTER]
	}

	pub fn cells(&self) -> impl Iterator<Item = &Cell> {
		self.cells.iter()
	}

	/// Grains on the whole grid, counting each wedge cell once per mirror image.
	pub fn mass(&self, value: impl Fn(&Cell) -> Grains) -> Grains {
		self.cells
			.iter()
			.map(|c| c.classification.multiplicity() * value(c))
			.sum()
	}
}
