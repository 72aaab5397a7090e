//! Projection of wedge cells onto the full grid.

use crate::{lattice::Lattice, Grains};

/// Colour bucket of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
	Empty,
	One,
	Two,
	Three,
	/// Four or more grains, a state that lasts until the next topple.
	Overflow,
}

impl ColorClass {
	pub fn of(grains: Grains) -> ColorClass {
		match grains {
			0 => ColorClass::Empty,
			1 => ColorClass::One,
			2 => ColorClass::Two,
			3 => ColorClass::Three,
			_ => ColorClass::Overflow,
		}
	}

	pub fn rgba(self) -> [u8; 4] {
		match self {
			ColorClass::Empty => [255, 255, 255, 255],
			ColorClass::One => [69, 178, 157, 255],
			ColorClass::Two => [239, 201, 76, 255],
			ColorClass::Three => [226, 122, 63, 255],
			ColorClass::Overflow => [223, 90, 73, 255],
		}
	}

	pub fn glyph(self) -> char {
		match self {
			ColorClass::Empty => ' ',
			ColorClass::One => '.',
			ColorClass::Two => ':',
			ColorClass::Three => '&',
			ColorClass::Overflow => '#',
		}
	}
}

/// One grid position to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawEvent {
	pub x: usize,
	pub y: usize,
	pub color: ColorClass,
}

/// Receives draw events at every flush.
pub trait Renderer {
	fn draw(&mut self, event: DrawEvent);

	/// Called once after the events of a flush.
	fn present(&mut self) {}
}

impl Renderer for () {
	fn draw(&mut self, _event: DrawEvent) {}
}

impl Renderer for Vec<DrawEvent> {
	fn draw(&mut self, event: DrawEvent) {
		self.push(event);
	}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
	fn draw(&mut self, event: DrawEvent) {
		(**self).draw(event)
	}

	fn present(&mut self) {
		(**self).present()
	}
}

/// Distinct on-grid images of `(x, y)` under the eight symmetries of a
/// `size`-sided grid, `(x, y)` itself first. Images past the far edge of an
/// even-sized grid are left out.
pub fn mirror_positions(size: usize, x: usize, y: usize) -> Vec<(usize, usize)> {
	let m = (size / 2) as i64;
	let (a, b) = (m - x as i64, m - y as i64);
	let images = [
		(a, b),
		(b, a),
		(-a, b),
		(-b, a),
		(a, -b),
		(b, -a),
		(-a, -b),
		(-b, -a),
	];
	let mut out: Vec<(usize, usize)> = Vec::with_capacity(images.len());
	for (p, q) in images.iter() {
		let (gx, gy) = (m - p, m - q);
		if gx < 0 || gy < 0 || gx >= size as i64 || gy >= size as i64 {
			continue;
		}
		let pos = (gx as usize, gy as usize);
		if !out.contains(&pos) {
			out.push(pos);
		}
	}
	out
}

/// Paints the wedge cell at `index` and all of its mirror images.
pub fn project<R: Renderer + ?Sized>(lattice: &Lattice, index: usize, renderer: &mut R) {
	let cell = lattice.cell(index);
	let color = ColorClass::of(cell.current);
	for (x, y) in mirror_positions(lattice.size(), cell.x, cell.y) {
		renderer.draw(DrawEvent { x, y, color });
	}
}
