//! Ad provider capability
//!
//! The ad network SDK is a black box to this crate. A provider creates one
//! client per ad request; the client loads, shows and reports [`AdEvent`]s
//! to its listeners.

use crate::error::Result;
use crate::types::{AdEvent, AdFormat, RequestOptions};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Listener invoked synchronously for every provider event
pub type AdEventHandler = Arc<dyn Fn(AdEvent) + Send + Sync>;

/// Ad network SDK entry point
pub trait AdProvider: Send + Sync + 'static {
    type Client: AdClient;

    /// One-time SDK startup, called by the app at launch
    fn initialize(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Create a client for one ad slot
    fn create_for_ad_request(
        &self,
        format: AdFormat,
        unit_id: &str,
        options: &RequestOptions,
    ) -> Result<Self::Client>;
}

/// Provider object for a single ad slot
pub trait AdClient: Send + Sync + 'static {
    /// Start fetching an ad. The outcome arrives as `Loaded` or `Error`.
    fn load(&self) -> Result<()>;

    /// Present the loaded ad. Resolves once the ad is on screen.
    fn show(&self) -> impl Future<Output = Result<()>> + Send;

    /// Register a listener for all event kinds
    fn add_ad_event_listener(&self, handler: AdEventHandler) -> Subscription;
}

/// Listener registration, removed on drop
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// Remove the listener now. Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
