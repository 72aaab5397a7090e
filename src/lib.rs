//! Abelian sandpile on a square grid, grown from a pile of grains dropped on
//! the center.
//!
//! The pile keeps the eight symmetries of the square, so only one eighth of
//! the grid (the wedge, see [`lattice`]) is stored and toppled. Work is
//! incremental: each step only looks at the cells whose value changed in the
//! step before, and only cells whose displayed colour changed are handed to
//! the [`Renderer`] at a flush.
//!
//! ```no_run
//! use sandpile::{Canvas, Session, SimConfig, TracingStats};
//!
//! let mut session = Session::new(SimConfig::square(101, 20_000))?;
//! let mut canvas = Canvas::new(101);
//! session.run_to_completion(&mut canvas, &mut TracingStats, None);
//! canvas.png("pile.png")?;
//! # Ok::<(), sandpile::Error>(())
//! ```

pub mod active;
pub mod canvas;
pub mod config;
pub mod error;
pub mod lattice;
pub mod projector;
pub mod queue;
pub mod session;
pub mod stats;
pub mod topple;

pub use active::ActiveSet;
pub use canvas::Canvas;
pub use config::SimConfig;
pub use error::{Error, Result};
pub use lattice::{Cell, Classification, Lattice};
pub use projector::{mirror_positions, ColorClass, DrawEvent, Renderer};
pub use queue::WorkQueue;
pub use session::{CancelToken, Continuation, SchedulerState, Session, Speed, StopReason};
pub use stats::{format_clock, FlushStats, StatsSink, TracingStats};

/// Grain count of a cell.
pub type Grains = u64;

/// A cell holding this many grains topples.
pub const THRESHOLD: Grains = 4;
