use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use sandpile::{format_clock, Canvas, Session, SimConfig, TracingStats};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drop grains on the center of a square grid and topple them until the pile settles.
#[derive(Parser, Debug)]
#[command(name = "sandpile", version)]
struct Args {
	/// Side of the square grid.
	#[arg(long, default_value_t = 320)]
	size: usize,

	/// Grains placed on the center cell.
	#[arg(long, default_value_t = 10_000_000)]
	grains: u64,

	/// Steps between flushes of the picture and progress report.
	#[arg(long, default_value_t = 1000)]
	flush_interval: usize,

	/// Work queue capacity; defaults to the wedge size, which never overflows.
	#[arg(long)]
	capacity: Option<usize>,

	/// Cancel after this many steps.
	#[arg(long)]
	max_steps: Option<u64>,

	/// Write the final pile to this PNG file.
	#[arg(long)]
	png: Option<PathBuf>,

	/// Print the final pile as text.
	#[arg(long)]
	ascii: bool,
}

fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "sandpile=info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let args = Args::parse();
	let config = SimConfig {
		width: args.size,
		height: args.size,
		grains: args.grains,
		queue_capacity: args.capacity,
		flush_interval: args.flush_interval,
		..SimConfig::default()
	};
	let mut session = Session::new(config).context("invalid configuration")?;
	let mut canvas = Canvas::new(args.size);

	let started = Instant::now();
	let reason = session.run_to_completion(&mut canvas, &mut TracingStats, args.max_steps);
	let lattice = session.lattice();
	info!(
		?reason,
		clock = %format_clock(started.elapsed()),
		iterations = session.iterations(),
		topples = session.topples(),
		lost = session.lost(),
		dropped = session.dropped(),
		center = lattice.center().current,
		"done"
	);

	if args.ascii {
		print!("{}", canvas);
	}
	if let Some(path) = args.png {
		canvas
			.png(&path)
			.with_context(|| format!("can't write {}", path.display()))?;
		info!(path = %path.display(), frames = canvas.frames(), "wrote png");
	}
	Ok(())
}
