use std::{fmt, fs::File, path::Path};

use crate::{
	projector::{ColorClass, DrawEvent, Renderer},
	Result,
};

/// Full-grid picture built from draw events.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
	size: usize,
	pixels: Vec<ColorClass>,
	frames: u64,
}

impl Canvas {
	pub fn new(size: usize) -> Canvas {
		Canvas {
			size,
			pixels: vec![ColorClass::Empty; size * size],
			frames: 0,
		}
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn get(&self, x: usize, y: usize) -> Option<ColorClass> {
		if x < self.size && y < self.size {
			Some(self.pixels[y * self.size + x])
		} else {
			None
		}
	}

	/// Number of flushes presented so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	pub fn png(&self, fname: impl AsRef<Path>) -> Result<()> {
		let mut data = vec![0; self.pixels.len() * 4];
		for (p, color) in self.pixels.iter().enumerate() {
			data[p * 4..p * 4 + 4].copy_from_slice(&color.rgba());
		}
		repng::encode(File::create(fname)?, self.size as u32, self.size as u32, &data)?;
		Ok(())
	}
}

impl Renderer for Canvas {
	fn draw(&mut self, event: DrawEvent) {
		if event.x < self.size && event.y < self.size {
			self.pixels[event.y * self.size + event.x] = event.color;
		}
	}

	fn present(&mut self) {
		self.frames += 1;
	}
}

impl fmt::Display for Canvas {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for row in self.pixels.chunks(self.size.max(1)) {
			let line: String = row.iter().map(|c| c.glyph()).collect();
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn draws_and_prints() {
		let mut canvas = Canvas::new(3);
		canvas.draw(DrawEvent { x: 1, y: 0, color: ColorClass::One });
		canvas.draw(DrawEvent { x: 2, y: 2, color: ColorClass::Three });
		canvas.draw(DrawEvent { x: 5, y: 0, color: ColorClass::Two });
		canvas.present();
		assert_eq!(canvas.to_string(), " . \n   \n  &\n");
		assert_eq!(canvas.get(1, 0), Some(ColorClass::One));
		assert_eq!(canvas.get(3, 0), None);
		assert_eq!(canvas.frames(), 1);
	}

	#[test]
	fn writes_png() {
		let mut canvas = Canvas::new(4);
		canvas.draw(DrawEvent { x: 0, y: 0, color: ColorClass::Overflow });
		let path = std::env::temp_dir().join(format!("sandpile-canvas-{}.png", std::process::id()));
		canvas.png(&path).unwrap();
		let bytes = std::fs::read(&path).unwrap();
		std::fs::remove_file(&path).unwrap();
		assert_eq!(&bytes[1..4], b"PNG");
	}
}
