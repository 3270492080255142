//! Shared render counters and the terminal progress bar.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Width of the bar in characters, minus one.
pub const BAR_STOPS: usize = 69;

/// Counters shared between the workers and the reporter.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    completed: AtomicUsize,
    rays: AtomicU64,
    active_workers: AtomicUsize,
}

impl Progress {
    pub fn new(total_tiles: usize, workers: usize) -> Self {
        Self {
            total: total_tiles,
            completed: AtomicUsize::new(0),
            rays: AtomicU64::new(0),
            active_workers: AtomicUsize::new(workers),
        }
    }

    /// Record a finished tile and the rays it took.
    pub fn tile_finished(&self, rays: u64) {
        self.rays.fetch_add(rays, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Release);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn rays(&self) -> u64 {
        self.rays.load(Ordering::Relaxed)
    }

    /// Completed share of the tiles in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed() as f64 / self.total as f64).min(1.0)
    }

    /// True once every tile is done or no worker is left to finish them.
    pub fn is_finished(&self) -> bool {
        self.completed() >= self.total || self.active_workers.load(Ordering::Acquire) == 0
    }

    /// Marks one worker as gone when dropped, even if it unwinds.
    pub fn worker_guard(&self) -> WorkerGuard<'_> {
        WorkerGuard { progress: self }
    }
}

/// Drop guard returned by [`Progress::worker_guard`].
#[derive(Debug)]
pub struct WorkerGuard<'a> {
    progress: &'a Progress,
}

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.progress.active_workers.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One frame of the bar, e.g. `[=====.....][ 42.0%    3.20 sec]`.
pub fn progress_line(fraction: f64, elapsed: Duration) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = ((BAR_STOPS as f64 * fraction) as usize + 1).min(BAR_STOPS + 1);
    format!(
        "[{}{}][{:5.1}% {:7.2} sec]",
        "=".repeat(filled),
        ".".repeat(BAR_STOPS + 1 - filled),
        100.0 * fraction,
        elapsed.as_secs_f64(),
    )
}

/// Closing line with timing and throughput.
pub fn summary_line(elapsed: Duration, rays: u64) -> String {
    let seconds = elapsed.as_secs_f64();
    let rate = if seconds > 0.0 { rays as f64 / seconds } else { 0.0 };
    format!(
        "[{}] {:.3} sec - total rays: {} ({:.0} rays/sec)",
        "=".repeat(BAR_STOPS + 1),
        seconds,
        rays,
        rate,
    )
}

/// Poll `progress` every `interval`, redrawing the bar until the render is
/// finished, then print the summary.
pub fn report<W: Write + ?Sized>(
    progress: &Progress,
    interval: Duration,
    start: Instant,
    out: &mut W,
) -> io::Result<()> {
    loop {
        write!(out, "\r\x1b[K{}", progress_line(progress.fraction(), start.elapsed()))?;
        out.flush()?;

        if progress.is_finished() {
            break;
        }
        thread::sleep(interval);
    }

    writeln!(out, "\r\x1b[K{}", summary_line(start.elapsed(), progress.rays()))?;
    out.flush()
}
