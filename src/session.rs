//! The tick scheduler.
//!
//! A [`Session`] owns the lattice and its queues and advances them one step
//! at a time. The host decides how steps are grouped: [`Session::run_frame`]
//! runs up to the next flush boundary and is the natural unit to call between
//! other work, [`Session::run_slice`] bounds a call by step count.

use std::{
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::Instant,
};

use tracing::{debug, trace};

use crate::{
	active::ActiveSet,
	config::SimConfig,
	lattice::Lattice,
	projector::{project, Renderer},
	stats::{FlushStats, StatsSink},
	topple::topple,
	Error, Grains, Result, THRESHOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// A step found nothing left to change.
	Settled,
	Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
	Idle,
	Running,
	Stopped(StopReason),
}

/// What the host should do after a call into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
	Continue,
	Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
	/// Flush after every step.
	Detailed,
	/// Batch several steps per flush.
	Fast,
}

/// Cooperative stop request, observed at the next step boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

pub struct Session {
	config: SimConfig,
	lattice: Lattice,
	active: ActiveSet,
	state: SchedulerState,
	flush_interval: usize,
	cancel: CancelToken,
	iterations: u64,
	topples: u64,
	lost: Grains,
	started: Instant,
	last_flush: Instant,
	last_flush_iteration: u64,
}

impl Session {
	/// Builds a session with every grain on the center cell.
	pub fn new(config: SimConfig) -> Result<Session> {
		config.validate()?;
		let mut lattice = Lattice::new(config.width);
		let mut active = ActiveSet::new(config.capacity());
		lattice.cell_mut(Lattice::CENTER).next = config.grains;
		active.enqueue_if_absent(&mut lattice, Lattice::CENTER);
		// draw the seed on the first flush even if it never drops below four
		active.mark_dirty(&mut lattice, Lattice::CENTER);
		let now = Instant::now();
		Ok(Session {
			flush_interval: config.flush_interval,
			config,
			lattice,
			active,
			state: SchedulerState::Idle,
			cancel: CancelToken::default(),
			iterations: 0,
			topples: 0,
			lost: 0,
			started: now,
			last_flush: now,
			last_flush_iteration: 0,
		})
	}

	pub fn start(&mut self) {
		if self.state != SchedulerState::Idle {
			return;
		}
		debug!(
			size = self.config.width,
			grains = self.config.grains,
			wedge_cells = self.lattice.len(),
			capacity = self.active.pending().capacity(),
			"starting sandpile"
		);
		self.state = SchedulerState::Running;
		self.started = Instant::now();
		self.last_flush = self.started;
	}

	/// Runs one step: commit, topple, and flush if on a boundary.
	pub fn step<R, S>(&mut self, renderer: &mut R, stats: &mut S) -> Continuation
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		match self.state {
			SchedulerState::Stopped(reason) => return Continuation::Stopped(reason),
			SchedulerState::Idle => self.start(),
			SchedulerState::Running => {}
		}
		if self.cancel.is_cancelled() {
			return self.stop(StopReason::Cancelled, renderer, stats);
		}

		let changed = self.active.begin_step(&mut self.lattice);
		for i in 0..self.active.checking().len() {
			let index = self.active.checking().as_slice()[i];
			if self.lattice.cell(index).current >= THRESHOLD {
				self.lost += topple(&mut self.lattice, &mut self.active, index);
				self.topples += 1;
			}
		}
		self.iterations += 1;

		if !changed || self.active.pending().is_empty() {
			return self.stop(StopReason::Settled, renderer, stats);
		}
		if self.iterations % self.flush_interval as u64 == 0 {
			self.flush(renderer, stats);
		}
		Continuation::Continue
	}

	/// Runs at most `max_steps` steps.
	pub fn run_slice<R, S>(&mut self, max_steps: usize, renderer: &mut R, stats: &mut S) -> Continuation
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		for _ in 0..max_steps {
			if let Continuation::Stopped(reason) = self.step(renderer, stats) {
				return Continuation::Stopped(reason);
			}
		}
		self.continuation()
	}

	/// Runs steps until the next flush boundary.
	pub fn run_frame<R, S>(&mut self, renderer: &mut R, stats: &mut S) -> Continuation
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		loop {
			if let Continuation::Stopped(reason) = self.step(renderer, stats) {
				return Continuation::Stopped(reason);
			}
			if self.iterations % self.flush_interval as u64 == 0 {
				return Continuation::Continue;
			}
		}
	}

	/// Runs frames until the pile settles, cancelling once `max_iterations`
	/// steps have run.
	pub fn run_to_completion<R, S>(
		&mut self,
		renderer: &mut R,
		stats: &mut S,
		max_iterations: Option<u64>,
	) -> StopReason
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		loop {
			if let Continuation::Stopped(reason) = self.run_frame(renderer, stats) {
				return reason;
			}
			if max_iterations.map_or(false, |max| self.iterations >= max) {
				self.cancel();
			}
		}
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Handle that stops the session from elsewhere, e.g. a signal handler.
	pub fn cancel_token(&self) -> CancelToken {
		self.cancel.clone()
	}

	pub fn set_flush_interval(&mut self, interval: usize) -> Result<()> {
		if interval == 0 {
			return Err(Error::ZeroFlushInterval);
		}
		if interval != self.flush_interval {
			debug!(from = self.flush_interval, to = interval, "flush interval changed");
			self.flush_interval = interval;
		}
		Ok(())
	}

	/// Switches between flushing every step and the configured fast interval.
	pub fn toggle_speed(&mut self) -> Speed {
		let interval = match self.speed() {
			Speed::Detailed => self.config.fast_flush_interval,
			Speed::Fast => 1,
		};
		self.flush_interval = interval;
		debug!(interval, "speed toggled");
		self.speed()
	}

	pub fn speed(&self) -> Speed {
		if self.flush_interval == 1 {
			Speed::Detailed
		} else {
			Speed::Fast
		}
	}

	pub fn flush_interval(&self) -> usize {
		self.flush_interval
	}

	pub fn state(&self) -> SchedulerState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == SchedulerState::Running
	}

	pub fn iterations(&self) -> u64 {
		self.iterations
	}

	pub fn topples(&self) -> u64 {
		self.topples
	}

	/// Grid-wide grains lost over the grid boundary.
	pub fn lost(&self) -> Grains {
		self.lost
	}

	pub fn dropped(&self) -> u64 {
		self.active.dropped()
	}

	pub fn lattice(&self) -> &Lattice {
		&self.lattice
	}

	pub fn active(&self) -> &ActiveSet {
		&self.active
	}

	pub fn config(&self) -> &SimConfig {
		&self.config
	}

	fn continuation(&self) -> Continuation {
		match self.state {
			SchedulerState::Stopped(reason) => Continuation::Stopped(reason),
			_ => Continuation::Continue,
		}
	}

	fn stop<R, S>(&mut self, reason: StopReason, renderer: &mut R, stats: &mut S) -> Continuation
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		self.flush(renderer, stats);
		self.state = SchedulerState::Stopped(reason);
		debug!(
			?reason,
			iterations = self.iterations,
			topples = self.topples,
			lost = self.lost,
			dropped = self.active.dropped(),
			"sandpile stopped"
		);
		Continuation::Stopped(reason)
	}

	fn flush<R, S>(&mut self, renderer: &mut R, stats: &mut S)
	where
		R: Renderer + ?Sized,
		S: StatsSink + ?Sized,
	{
		let drawn = self.active.dirty().len();
		self.active
			.drain_dirty(&mut self.lattice, |lattice, index| project(lattice, index, &mut *renderer));
		renderer.present();

		let now = Instant::now();
		let report = FlushStats {
			since_last_flush: now - self.last_flush,
			total_elapsed: now - self.started,
			iterations: self.iterations,
			steps_in_batch: self.iterations - self.last_flush_iteration,
			center_grains: self.lattice.center().next,
			dropped: self.active.dropped(),
		};
		self.last_flush = now;
		self.last_flush_iteration = self.iterations;
		trace!(iterations = self.iterations, drawn, "flush");
		stats.report(&report);
	}
}
