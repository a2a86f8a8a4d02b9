//! Clock and sleep helpers on top of the tokio timer

pub use tokio::time::{Duration, Instant};

/// Sleep for a number of milliseconds.
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Current monotonic time.
///
/// Follows tokio's clock, so paused-time tests advance it deterministically.
pub fn now() -> Instant {
    Instant::now()
}

/// Milliseconds elapsed since `earlier`, saturating at zero.
pub fn elapsed_ms(earlier: Instant) -> u64 {
    now().saturating_duration_since(earlier).as_millis() as u64
}
