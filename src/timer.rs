//! Timer - wall-clock latency of one query execution

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::executor::QueryExecutor;

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;
}

/// Production clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that advances by a fixed step on every read.
///
/// A start/stop pair therefore always measures exactly one step.
#[derive(Debug)]
pub struct SteppingClock {
    step_ns: u64,
    current_ns: AtomicU64,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step_ns: step.as_nanos() as u64,
            current_ns: AtomicU64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Duration {
        let ns = self.current_ns.fetch_add(self.step_ns, Ordering::Relaxed);
        Duration::from_nanos(ns)
    }
}

/// Whole seconds plus nanoseconds, as fractional milliseconds
#[inline]
pub fn duration_to_ms(d: Duration) -> f64 {
    d.as_secs() as f64 * 1000.0 + d.subsec_nanos() as f64 / 1e6
}

/// One timed execution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub elapsed_ms: f64,
    pub rows: u64,
}

/// Run `sql` once on `executor` and measure it. Errors are returned untouched.
pub async fn time_execution<E, C>(
    clock: &C,
    executor: &mut E,
    sql: &str,
) -> Result<Measurement, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();
    let rows = executor.execute_query(sql).await?;
    let elapsed = clock.now().saturating_sub(start);
    Ok(Measurement {
        elapsed_ms: duration_to_ms(elapsed),
        rows,
    })
}
