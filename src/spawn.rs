//! Background task helper

use std::future::Future;
use tokio::task::AbortHandle;

/// Spawn a future to run in the background.
///
/// Returns an abort handle so the owner can cancel the task on teardown.
pub fn spawn<F>(future: F) -> AbortHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future).abort_handle()
}
