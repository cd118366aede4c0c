//! Bounded worker pool driving candidates through the prober

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use super::cleanup::{ActivityLog, CleanupLoop, ProbeCounters};
use crate::config_error;
use crate::error::{ProbeError, Result};
use crate::probe::Prober;
use crate::store::{Admission, ResultStore};
use crate::types::{Classification, RunSummary, ScanConfig};

/// Totals for the whole run; unlike the cleanup counters these are never reset
#[derive(Default)]
struct RunTotals {
    probed: AtomicU64,
    found: AtomicU64,
    empty: AtomicU64,
    skipped: AtomicU64,
}

/// Per-run state shared by every worker
struct RunContext {
    totals: RunTotals,
    activity: Arc<ActivityLog>,
    counters: Arc<ProbeCounters>,
    progress: ProgressBar,
    halt: AtomicBool,
    fatal: Mutex<Option<ProbeError>>,
}

/// Probes candidates with at most `workers` requests in flight
pub struct Scanner {
    prober: Arc<dyn Prober>,
    store: ResultStore,
    config: ScanConfig,
    shutdown: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(prober: Arc<dyn Prober>, store: ResultStore, config: ScanConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(config_error!("Worker count must be at least 1"));
        }
        Ok(Self {
            prober,
            store,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that stops dispatch of new candidates once set.
    ///
    /// Probes already in flight still finish and get recorded.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let bar = match total {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {pos}/{len} {per_sec} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    /// Probe every candidate until the sequence ends or shutdown is requested.
    ///
    /// A store write failure stops dispatch and is returned once the workers
    /// in flight have finished.
    pub async fn run<I>(&self, candidates: I, total: Option<u64>) -> Result<RunSummary>
    where
        I: IntoIterator<Item = String>,
    {
        let started_at = Utc::now();
        let progress = self.progress_bar(total);

        let cleanup = CleanupLoop::new(self.config.cleanup_interval, self.config.activity_capacity)
            .clear_terminal(self.config.clear_terminal)
            .with_progress(progress.clone());
        let ctx = RunContext {
            totals: RunTotals::default(),
            activity: cleanup.activity(),
            counters: cleanup.counters(),
            progress,
            halt: AtomicBool::new(false),
            fatal: Mutex::new(None),
        };
        let cleanup_handle = cleanup.spawn();

        tracing::info!(
            workers = self.config.workers,
            total = ?total,
            prober = self.prober.name(),
            "Starting probe run"
        );

        let ctx_ref = &ctx;
        stream::iter(candidates)
            .take_while(|_| {
                let stop = self.shutdown.load(Ordering::SeqCst) || ctx_ref.halt.load(Ordering::SeqCst);
                future::ready(!stop)
            })
            .for_each_concurrent(self.config.workers, |domain| self.handle(domain, ctx_ref))
            .await;

        if let Some(handle) = cleanup_handle {
            handle.stop().await;
        }
        ctx.progress.finish_and_clear();

        if let Some(err) = ctx.fatal.lock().take() {
            return Err(err);
        }

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            probed: ctx.totals.probed.load(Ordering::SeqCst),
            found: ctx.totals.found.load(Ordering::SeqCst),
            empty: ctx.totals.empty.load(Ordering::SeqCst),
            skipped: ctx.totals.skipped.load(Ordering::SeqCst),
            interrupted: self.shutdown.load(Ordering::SeqCst),
        };

        tracing::info!(
            probed = summary.probed,
            found = summary.found,
            empty = summary.empty,
            skipped = summary.skipped,
            interrupted = summary.interrupted,
            "Probe run finished"
        );

        Ok(summary)
    }

    async fn handle(&self, domain: String, ctx: &RunContext) {
        let admission = self.store.admit(&domain);
        if admission != Admission::Probe {
            tracing::trace!(domain = %domain, admission = ?admission, "Skipping candidate");
            ctx.totals.skipped.fetch_add(1, Ordering::Relaxed);
            ctx.counters.record_skip();
            ctx.progress.inc(1);
            return;
        }

        ctx.activity.push(format!("Testing: {}", domain));
        ctx.progress.set_message(domain.clone());

        let report = self.prober.probe(&domain).await;
        let recorded = match report.classification {
            Classification::Found => self.store.record_found(&domain),
            Classification::Empty => self.store.record_empty(&domain),
        };

        ctx.totals.probed.fetch_add(1, Ordering::Relaxed);
        ctx.counters.record(report.classification);
        ctx.progress.inc(1);

        match recorded {
            Ok(_) => match report.classification {
                Classification::Found => {
                    ctx.totals.found.fetch_add(1, Ordering::Relaxed);
                    ctx.progress.suspend(|| {
                        tracing::info!(
                            domain = %domain,
                            status = ?report.status_code,
                            text_len = ?report.text_len,
                            "Found live site"
                        );
                    });
                }
                Classification::Empty => {
                    ctx.totals.empty.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(domain = %domain, detail = ?report.detail, "Empty");
                }
            },
            Err(e) => {
                self.store.release(&domain);
                tracing::error!(domain = %domain, error = %e, "Failed to record result, stopping");
                ctx.halt.store(true, Ordering::SeqCst);
                ctx.fatal.lock().get_or_insert(e);
            }
        }
    }
}
