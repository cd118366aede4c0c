//! Periodic cleanup of in-memory activity during long runs

use std::collections::VecDeque;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::types::Classification;

/// Bounded buffer of recent probe lines.
///
/// When full, the oldest line is dropped. Each cleanup pass logs the tail
/// before clearing it.
pub struct ActivityLog {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock();
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent lines, oldest first
    pub fn recent(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    /// Drop everything, returning how many lines were held
    pub fn reset(&self) -> usize {
        let mut lines = self.lines.lock();
        let held = lines.len();
        lines.clear();
        lines.shrink_to_fit();
        held
    }
}

/// Probe counts since the last cleanup
#[derive(Debug, Default)]
pub struct ProbeCounters {
    probed: AtomicU64,
    found: AtomicU64,
    empty: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`ProbeCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub probed: u64,
    pub found: u64,
    pub empty: u64,
    pub skipped: u64,
}

impl ProbeCounters {
    pub fn record(&self, classification: Classification) {
        self.probed.fetch_add(1, Ordering::Relaxed);
        match classification {
            Classification::Found => self.found.fetch_add(1, Ordering::Relaxed),
            Classification::Empty => self.empty.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            probed: self.probed.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter, returning the values they held
    pub fn reset(&self) -> CounterSnapshot {
        CounterSnapshot {
            probed: self.probed.swap(0, Ordering::Relaxed),
            found: self.found.swap(0, Ordering::Relaxed),
            empty: self.empty.swap(0, Ordering::Relaxed),
            skipped: self.skipped.swap(0, Ordering::Relaxed),
        }
    }
}

/// Lines of activity shown by each cleanup pass
pub const ACTIVITY_TAIL: usize = 3;

/// What one cleanup pass cleared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub counters: CounterSnapshot,
    pub lines_cleared: usize,
    /// Most recent activity lines before the reset, oldest first
    pub recent: Vec<String>,
    pub terminal_cleared: bool,
}

/// Owns the activity log and interval counters and resets them on a timer
pub struct CleanupLoop {
    interval: Duration,
    activity: Arc<ActivityLog>,
    counters: Arc<ProbeCounters>,
    clear_terminal: bool,
    progress: Option<ProgressBar>,
}

impl CleanupLoop {
    pub fn new(interval: Duration, activity_capacity: usize) -> Self {
        Self {
            interval,
            activity: Arc::new(ActivityLog::new(activity_capacity)),
            counters: Arc::new(ProbeCounters::default()),
            clear_terminal: false,
            progress: None,
        }
    }

    pub fn clear_terminal(mut self, enabled: bool) -> Self {
        self.clear_terminal = enabled;
        self
    }

    /// Redraw around this bar when clearing the terminal
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn activity(&self) -> Arc<ActivityLog> {
        Arc::clone(&self.activity)
    }

    pub fn counters(&self) -> Arc<ProbeCounters> {
        Arc::clone(&self.counters)
    }

    /// Run one cleanup pass. Never fails.
    pub fn run_once(&self) -> CleanupReport {
        let counters = self.counters.reset();
        let recent = self.activity.recent(ACTIVITY_TAIL);
        let lines_cleared = self.activity.reset();
        let terminal_cleared = self.clear_terminal && self.wipe_terminal();

        tracing::info!(
            probed = counters.probed,
            found = counters.found,
            empty = counters.empty,
            skipped = counters.skipped,
            lines_cleared,
            terminal_cleared,
            recent = %recent.join(" | "),
            "Cleanup pass"
        );

        CleanupReport {
            counters,
            lines_cleared,
            recent,
            terminal_cleared,
        }
    }

    fn wipe_terminal(&self) -> bool {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return false;
        }

        let mut wipe = || {
            stdout
                .write_all(b"\x1B[2J\x1B[1;1H")
                .and_then(|_| stdout.flush())
        };
        let result = match &self.progress {
            Some(progress) => progress.suspend(wipe),
            None => wipe(),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear terminal");
                false
            }
        }
    }

    /// Start the timer. Returns `None` when the interval is zero.
    pub fn spawn(self) -> Option<CleanupHandle> {
        if self.interval.is_zero() {
            return None;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_once();
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Some(CleanupHandle { stop: stop_tx, handle })
    }
}

/// Running cleanup timer
pub struct CleanupHandle {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CleanupHandle {
    /// Stop the timer and wait for the task to exit
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Cleanup task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_log_is_bounded() {
        let log = ActivityLog::new(3);
        for i in 0..5 {
            log.push(format!("line {}", i));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.recent(2), vec!["line 3", "line 4"]);
        assert_eq!(log.recent(10), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_activity_log_reset() {
        let log = ActivityLog::new(10);
        log.push("a");
        log.push("b");
        assert_eq!(log.reset(), 2);
        assert!(log.is_empty());
        assert_eq!(log.reset(), 0);
    }

    #[test]
    fn test_counters_reset_returns_previous() {
        let counters = ProbeCounters::default();
        counters.record(Classification::Found);
        counters.record(Classification::Empty);
        counters.record(Classification::Empty);
        counters.record_skip();

        let expected = CounterSnapshot {
            probed: 3,
            found: 1,
            empty: 2,
            skipped: 1,
        };
        assert_eq!(counters.snapshot(), expected);
        assert_eq!(counters.reset(), expected);
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_run_once_clears_buffers() {
        let cleanup = CleanupLoop::new(Duration::from_secs(60), 100);
        cleanup.activity().push("Testing: abc.com");
        cleanup.counters().record(Classification::Empty);

        let report = cleanup.run_once();
        assert_eq!(report.lines_cleared, 1);
        assert_eq!(report.counters.empty, 1);
        assert!(!report.terminal_cleared);
        assert!(cleanup.activity().is_empty());
        assert_eq!(cleanup.counters().snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_run_once_reports_recent_activity() {
        let cleanup = CleanupLoop::new(Duration::from_secs(60), 100);
        for name in ["a.com", "b.com", "c.com", "d.com"] {
            cleanup.activity().push(format!("Testing: {}", name));
        }

        let report = cleanup.run_once();
        assert_eq!(report.lines_cleared, 4);
        assert_eq!(
            report.recent,
            vec!["Testing: b.com", "Testing: c.com", "Testing: d.com"]
        );
        assert!(cleanup.run_once().recent.is_empty());
    }

    #[test]
    fn test_zero_interval_does_not_spawn() {
        let cleanup = CleanupLoop::new(Duration::ZERO, 10);
        assert!(cleanup.spawn().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_resets_periodically() {
        let cleanup = CleanupLoop::new(Duration::from_secs(60), 10);
        let activity = cleanup.activity();
        let handle = cleanup.spawn().unwrap();

        activity.push("one");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(activity.len(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(activity.is_empty());

        handle.stop().await;
    }
}
