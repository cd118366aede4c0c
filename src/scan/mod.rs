//! Scanning: the worker pool and its cleanup timer

mod cleanup;
mod pool;

pub use cleanup::{
    ActivityLog, CleanupHandle, CleanupLoop, CleanupReport, CounterSnapshot, ProbeCounters,
};
pub use pool::Scanner;
