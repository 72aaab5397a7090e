//! Progress reports handed out at every flush.

use std::time::Duration;

use tracing::info;

use crate::Grains;

#[derive(Debug, Clone, PartialEq)]
pub struct FlushStats {
	/// Wall time since the previous flush.
	pub since_last_flush: Duration,
	/// Wall time since the session started.
	pub total_elapsed: Duration,
	pub iterations: u64,
	/// Steps run since the previous flush.
	pub steps_in_batch: u64,
	/// Grains still staged on the center cell.
	pub center_grains: Grains,
	/// Work queue pushes dropped so far.
	pub dropped: u64,
}

impl FlushStats {
	/// Mean wall time of the steps in this batch.
	pub fn average_step(&self) -> Duration {
		match u32::try_from(self.steps_in_batch) {
			Ok(0) => Duration::ZERO,
			Ok(n) => self.since_last_flush / n,
			Err(_) => Duration::from_secs_f64(self.since_last_flush.as_secs_f64() / self.steps_in_batch as f64),
		}
	}
}

/// Observes flush reports. Nothing flows back into the simulation.
pub trait StatsSink {
	fn report(&mut self, stats: &FlushStats);
}

impl StatsSink for () {
	fn report(&mut self, _stats: &FlushStats) {}
}

impl StatsSink for Vec<FlushStats> {
	fn report(&mut self, stats: &FlushStats) {
		self.push(stats.clone());
	}
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
	fn report(&mut self, stats: &FlushStats) {
		(**self).report(stats)
	}
}

/// Logs every report at `info`.
#[derive(Debug, Default)]
pub struct TracingStats;

impl StatsSink for TracingStats {
	fn report(&mut self, stats: &FlushStats) {
		info!(
			clock = %format_clock(stats.total_elapsed),
			iterations = stats.iterations,
			avg_step_ms = stats.average_step().as_secs_f64() * 1000.0,
			center_grains = stats.center_grains,
			dropped = stats.dropped,
			"flush"
		);
	}
}

/// `hh:mm:ss`, hours unbounded.
pub fn format_clock(elapsed: Duration) -> String {
	let secs = elapsed.as_secs();
	format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
