//! Row progress shared by the render workers.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct ProgressState {
    value: u32,
    max_value: u32,
    /// Last whole percentage written to the log
    reported: u32,
    start: Instant,
}

impl ProgressState {
    /// Add rows; returns the new percentage if it moved past the last report.
    fn advance(&mut self, delta: u32) -> Option<u32> {
        self.value += delta;
        let pct = percent(self.value, self.max_value);
        if pct == self.reported {
            return None;
        }
        self.reported = pct;
        Some(pct)
    }
}

/// Counter of finished rows, guarded by a mutex.
///
/// Workers call [`Progress::increment`] once per completed row, so the lock
/// is taken at most `height` times per pass.
#[derive(Debug)]
pub struct Progress {
    state: Mutex<ProgressState>,
}

impl Progress {
    pub fn new(max_value: u32) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                value: 0,
                max_value,
                reported: 0,
                start: Instant::now(),
            }),
        }
    }

    /// Reset the counter and clock for a new pass.
    pub fn start(&self, max_value: u32) {
        let mut state = self.lock();
        state.value = 0;
        state.max_value = max_value;
        state.reported = 0;
        state.start = Instant::now();
    }

    /// Record `delta` more finished rows and return the new total.
    ///
    /// Logs once per whole percent of progress.
    pub fn increment(&self, delta: u32) -> u32 {
        let mut state = self.lock();
        if let Some(pct) = state.advance(delta) {
            log::info!(
                "{:4} / {} ({:3}%) {:.3}s",
                state.value,
                state.max_value,
                pct,
                state.start.elapsed().as_secs_f64()
            );
        }
        state.value
    }

    /// Rows finished so far.
    pub fn value(&self) -> u32 {
        self.lock().value
    }

    /// Completed percentage in `0..=100`.
    pub fn percent(&self) -> u32 {
        let state = self.lock();
        percent(state.value, state.max_value)
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().start.elapsed()
    }

    /// Log the final count and time.
    pub fn done(&self) {
        let state = self.lock();
        log::debug!(
            "{} / {} rows in {:.3}s",
            state.value,
            state.max_value,
            state.start.elapsed().as_secs_f64()
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        // A worker panic already aborts the render; the counter stays usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn percent(value: u32, max_value: u32) -> u32 {
    if max_value == 0 {
        return 100;
    }
    (value as u64 * 100 / max_value as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_percent() {
        let progress = Progress::new(4);
        assert_eq!(progress.percent(), 0);
        assert_eq!(progress.increment(1), 1);
        assert_eq!(progress.increment(1), 2);
        assert_eq!(progress.percent(), 50);

        progress.start(10);
        assert_eq!(progress.value(), 0);
    }

    #[test]
    fn test_concurrent_increments() {
        let progress = Progress::new(800);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        progress.increment(1);
                    }
                });
            }
        });
        assert_eq!(progress.value(), 800);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_reports_once_per_percent() {
        let mut state = ProgressState {
            value: 0,
            max_value: 400,
            reported: 0,
            start: Instant::now(),
        };
        let reports: Vec<u32> = (0..400).filter_map(|_| state.advance(1)).collect();
        assert_eq!(reports, (1..=100).collect::<Vec<u32>>());

        // Fewer rows than percent steps still report every row
        let mut state = ProgressState {
            value: 0,
            max_value: 3,
            reported: 0,
            start: Instant::now(),
        };
        let reports: Vec<u32> = (0..3).filter_map(|_| state.advance(1)).collect();
        assert_eq!(reports, vec![33, 66, 100]);
    }

    #[test]
    fn test_empty_is_complete() {
        assert_eq!(Progress::new(0).percent(), 100);
    }
}
