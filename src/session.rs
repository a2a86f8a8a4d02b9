//! AdSession - lifecycle of one full-screen ad slot
//!
//! A session owns the provider client for its slot and walks it through
//! `Idle -> Loading -> Ready -> Showing -> Idle`, reloading after the ad is
//! closed and retrying with a growing delay after load errors. Every timer
//! it starts is tracked and aborted by [`AdSession::dispose`].

use crate::provider::{AdClient, AdProvider, Subscription};
use crate::spawn::spawn;
use crate::time::{Instant, elapsed_ms, now, sleep_ms};
use crate::types::*;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

const EVENT_CAPACITY: usize = 100;

/// Callback receiving `(reward_type, amount)` for every granted reward
pub type RewardCallback = Arc<dyn Fn(&str, u32) + Send + Sync>;

/// Ad format together with its format-specific hooks
#[derive(Clone)]
pub enum AdKind {
    Interstitial,
    Rewarded {
        on_earn_reward: Option<RewardCallback>,
    },
}

impl AdKind {
    /// Rewarded kind invoking `f` for every reward
    pub fn rewarded<F>(f: F) -> Self
    where
        F: Fn(&str, u32) + Send + Sync + 'static,
    {
        AdKind::Rewarded {
            on_earn_reward: Some(Arc::new(f)),
        }
    }

    pub fn format(&self) -> AdFormat {
        match self {
            AdKind::Interstitial => AdFormat::Interstitial,
            AdKind::Rewarded { .. } => AdFormat::Rewarded,
        }
    }
}

impl fmt::Debug for AdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdKind::Interstitial => f.write_str("Interstitial"),
            AdKind::Rewarded { on_earn_reward } => f
                .debug_struct("Rewarded")
                .field("on_earn_reward", &on_earn_reward.is_some())
                .finish(),
        }
    }
}

/// Mutable bookkeeping of a session, guarded by one lock
struct Slot<C> {
    status: AdStatus,
    last_shown_at: Option<Instant>,
    retry_count: u32,
    last_error: Option<String>,
    client: Option<Arc<C>>,
    subscription: Option<Subscription>,
    timers: Vec<AbortHandle>,
    disposed: bool,
}

impl<C> Slot<C> {
    fn new() -> Self {
        Self {
            status: AdStatus::Idle,
            last_shown_at: None,
            retry_count: 0,
            last_error: None,
            client: None,
            subscription: None,
            timers: Vec::new(),
            disposed: false,
        }
    }

    fn snapshot(&self) -> AdSnapshot {
        AdSnapshot {
            status: self.status,
            is_loaded: matches!(self.status, AdStatus::Ready | AdStatus::Showing),
            is_loading: self.status == AdStatus::Loading,
            error: self.last_error.clone(),
            retry_count: self.retry_count,
        }
    }
}

struct Shared<P: AdProvider> {
    provider: P,
    config: AdConfig,
    kind: AdKind,
    slot: Mutex<Slot<P::Client>>,
    state_tx: watch::Sender<AdSnapshot>,
    event_tx: mpsc::Sender<AdSessionEvent>,
}

/// AdSession - manages load, show, retry and throttle for one ad slot
pub struct AdSession<P: AdProvider> {
    shared: Arc<Shared<P>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<AdSessionEvent>>,
}

impl<P: AdProvider> AdSession<P> {
    /// Create a session and start its initialization timers.
    ///
    /// Must be called inside a tokio runtime. On a platform without ads
    /// nothing is scheduled and every operation is a no-op.
    pub fn new(provider: P, config: AdConfig, kind: AdKind) -> Self {
        let (state_tx, _) = watch::channel(AdSnapshot::default());
        let (event_tx, event_rx) = mpsc::channel(EVENT_CAPACITY);

        let shared = Arc::new(Shared {
            provider,
            config,
            kind,
            slot: Mutex::new(Slot::new()),
            state_tx,
            event_tx,
        });

        if shared.config.platform.supports_ads() {
            shared.start();
        } else {
            info!(
                "Ads unsupported on {:?}, {} session stays idle",
                shared.config.platform,
                shared.kind.format()
            );
        }

        Self {
            shared,
            event_rx: tokio::sync::Mutex::new(event_rx),
        }
    }

    /// Create an interstitial session
    pub fn interstitial(provider: P, config: AdConfig) -> Self {
        Self::new(provider, config, AdKind::Interstitial)
    }

    /// Create a rewarded session forwarding each reward to `on_earn_reward`
    pub fn rewarded<F>(provider: P, config: AdConfig, on_earn_reward: F) -> Self
    where
        F: Fn(&str, u32) + Send + Sync + 'static,
    {
        Self::new(provider, config, AdKind::rewarded(on_earn_reward))
    }

    /// Get the ad format
    pub fn format(&self) -> AdFormat {
        self.shared.kind.format()
    }

    /// Get the session config
    pub fn config(&self) -> &AdConfig {
        &self.shared.config
    }

    /// Get the ad provider
    pub fn provider(&self) -> &P {
        &self.shared.provider
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn snapshot(&self) -> AdSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn status(&self) -> AdStatus {
        self.shared.lock().status
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.shared.lock().last_error.clone()
    }

    pub fn retry_count(&self) -> u32 {
        self.shared.lock().retry_count
    }

    pub fn last_shown_at(&self) -> Option<Instant> {
        self.shared.lock().last_shown_at
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }

    /// Number of timers that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.shared
            .lock()
            .timers
            .iter()
            .filter(|t| !t.is_finished())
            .count()
    }

    /// Receiver notified on every state change
    pub fn watch(&self) -> watch::Receiver<AdSnapshot> {
        self.shared.state_tx.subscribe()
    }

    /// Receive next event (non-blocking)
    pub fn try_recv(&self) -> Option<AdSessionEvent> {
        self.event_rx.try_lock().ok()?.try_recv().ok()
    }

    /// Receive next event (blocking)
    pub async fn recv(&self) -> Option<AdSessionEvent> {
        self.event_rx.lock().await.recv().await
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Request a fresh ad unless a load is already in flight
    pub fn load_ad(&self) {
        self.shared.load_ad();
    }

    /// Show the loaded ad.
    ///
    /// Returns `false` without showing when ads are unsupported, the last ad
    /// was shown less than `min_interval_ms` ago, or no ad is ready. In the
    /// not-ready case a load is started if none is running and retries remain.
    pub async fn show_ad(&self) -> bool {
        self.shared.show_ad().await
    }

    /// Cancel all timers and release the provider client.
    ///
    /// No listener or timer callback runs afterwards. Idempotent.
    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl<P: AdProvider> Drop for AdSession<P> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl<P: AdProvider> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, Slot<P::Client>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, slot: &Slot<P::Client>) {
        self.state_tx.send_replace(slot.snapshot());
    }

    fn emit(&self, event: AdSessionEvent) {
        // Nobody may be listening; a full channel drops the event
        let _ = self.event_tx.try_send(event);
    }

    /// Run `task` after `delay_ms` unless the session is disposed first
    fn schedule<F>(self: &Arc<Self>, slot: &mut Slot<P::Client>, delay_ms: u64, task: F)
    where
        F: FnOnce(&Arc<Self>) + Send + 'static,
    {
        let weak = Arc::downgrade(self);
        let handle = spawn(async move {
            sleep_ms(delay_ms).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let disposed = shared.lock().disposed;
            if !disposed {
                task(&shared);
            }
        });

        slot.timers.retain(|t| !t.is_finished());
        slot.timers.push(handle);
    }

    fn start(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let init_delay = self.config.init_delay_ms;
        let preload_delay = self.config.preload_delay_ms;

        let handle = spawn(async move {
            sleep_ms(init_delay).await;
            match weak.upgrade() {
                Some(shared) if shared.initialize() => {}
                _ => return,
            }

            sleep_ms(preload_delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.load_ad();
            }
        });

        self.lock().timers.push(handle);
    }

    /// Create the provider client and register the event listener
    fn initialize(self: &Arc<Self>) -> bool {
        let format = self.kind.format();
        if self.lock().disposed {
            return false;
        }
        info!("Initializing {} ad", format);

        let created = self.config.resolve_unit_id(format).and_then(|unit_id| {
            self.provider
                .create_for_ad_request(format, &unit_id, &self.config.request_options())
        });
        let client = match created {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to create {} ad client: {}", format, e);
                let message = e.to_string();
                let mut slot = self.lock();
                slot.status = AdStatus::Error;
                slot.last_error = Some(message.clone());
                self.publish(&slot);
                self.emit(AdSessionEvent::LoadFailed {
                    message,
                    retry_count: slot.retry_count,
                });
                return false;
            }
        };

        let weak = Arc::downgrade(self);
        let subscription = client.add_ad_event_listener(Arc::new(move |event: AdEvent| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_event(event);
            }
        }));

        let mut slot = self.lock();
        if slot.disposed {
            drop(slot);
            drop(subscription);
            return false;
        }
        // A re-initialization replaces the previous handle, never mutates it
        let previous = (
            slot.subscription.replace(subscription),
            slot.client.replace(Arc::new(client)),
        );
        drop(slot);
        drop(previous);

        self.emit(AdSessionEvent::Initialized);
        true
    }

    fn load_ad(self: &Arc<Self>) {
        if !self.config.platform.supports_ads() {
            return;
        }

        let client = {
            let mut slot = self.lock();
            if slot.disposed || matches!(slot.status, AdStatus::Loading | AdStatus::Showing) {
                return;
            }
            let Some(client) = slot.client.clone() else {
                debug!("{} ad client not initialized yet", self.kind.format());
                return;
            };
            slot.status = AdStatus::Loading;
            slot.last_error = None;
            self.publish(&slot);
            client
        };

        info!("Loading {} ad", self.kind.format());
        if let Err(e) = client.load() {
            error!("Load error: {}", e);
            self.handle_load_error(e.to_string());
        }
    }

    fn handle_load_error(self: &Arc<Self>, message: String) {
        let max_retries = self.config.max_retries;
        let mut slot = self.lock();
        if slot.disposed {
            return;
        }

        slot.status = AdStatus::Error;
        slot.last_error = Some(message.clone());
        slot.retry_count = (slot.retry_count + 1).min(max_retries);
        let attempt = slot.retry_count;
        self.publish(&slot);
        self.emit(AdSessionEvent::LoadFailed {
            message,
            retry_count: attempt,
        });

        if attempt < max_retries {
            let delay_ms = self.config.retry_backoff_ms.saturating_mul(u64::from(attempt));
            info!(
                "Retrying {} ad load in {}ms (attempt {})",
                self.kind.format(),
                delay_ms,
                attempt
            );
            self.schedule(&mut slot, delay_ms, |shared| shared.load_ad());
            self.emit(AdSessionEvent::RetryScheduled { attempt, delay_ms });
        } else {
            warn!(
                "{} ad retries exhausted after {} attempts",
                self.kind.format(),
                attempt
            );
            self.emit(AdSessionEvent::RetriesExhausted);
        }
    }

    fn handle_event(self: &Arc<Self>, event: AdEvent) {
        if self.lock().disposed {
            return;
        }

        match event {
            AdEvent::Loaded => {
                info!("{} ad loaded", self.kind.format());
                let mut slot = self.lock();
                slot.status = AdStatus::Ready;
                slot.retry_count = 0;
                slot.last_error = None;
                self.publish(&slot);
                self.emit(AdSessionEvent::Loaded);
            }

            AdEvent::Error(message) => {
                warn!("{} ad error: {}", self.kind.format(), message);
                self.handle_load_error(message);
            }

            AdEvent::Closed => {
                info!("{} ad closed by user", self.kind.format());
                let mut slot = self.lock();
                if slot.status != AdStatus::Loading {
                    slot.status = AdStatus::Idle;
                }
                slot.last_shown_at = Some(now());
                self.publish(&slot);
                self.emit(AdSessionEvent::Closed);

                self.schedule(&mut slot, self.config.close_reload_delay_ms, |shared| {
                    {
                        let mut slot = shared.lock();
                        slot.retry_count = 0;
                        shared.publish(&slot);
                    }
                    shared.load_ad();
                });
            }

            AdEvent::EarnedReward(reward) => match &self.kind {
                AdKind::Rewarded { on_earn_reward } => {
                    info!(
                        "User earned reward: {} x{}",
                        reward.reward_type, reward.amount
                    );
                    if let Some(callback) = on_earn_reward {
                        callback(&reward.reward_type, reward.amount);
                    }
                    self.emit(AdSessionEvent::Reward(reward));
                }
                AdKind::Interstitial => {
                    debug!("Ignoring reward event on interstitial ad");
                }
            },
        }
    }

    async fn show_ad(self: &Arc<Self>) -> bool {
        if !self.config.platform.supports_ads() {
            return false;
        }

        let format = self.kind.format();
        let client = {
            let mut slot = self.lock();
            if slot.disposed {
                return false;
            }

            if let Some(last) = slot.last_shown_at {
                let since = elapsed_ms(last);
                if since < self.config.min_interval_ms {
                    info!("Too soon: only {}s since last {} ad", since / 1000, format);
                    self.emit(AdSessionEvent::Throttled {
                        remaining_ms: self.config.min_interval_ms - since,
                    });
                    return false;
                }
            }

            if slot.status == AdStatus::Showing {
                info!("{} ad is already on screen", format);
                return false;
            }

            let ready = match (&slot.client, slot.status) {
                (Some(client), AdStatus::Ready) => Some(client.clone()),
                _ => None,
            };
            let Some(client) = ready else {
                info!("{} ad not loaded yet", format);
                let reload =
                    slot.status != AdStatus::Loading && slot.retry_count < self.config.max_retries;
                drop(slot);
                if reload {
                    self.load_ad();
                }
                return false;
            };

            slot.status = AdStatus::Showing;
            self.publish(&slot);
            client
        };

        info!("Showing {} ad", format);
        let result = client.show().await;

        let mut slot = self.lock();
        if slot.disposed {
            return false;
        }

        match result {
            Ok(()) => {
                slot.last_shown_at = Some(now());
                self.publish(&slot);
                self.emit(AdSessionEvent::Shown);
                true
            }
            Err(e) => {
                error!("Show error: {}", e);
                let message = e.to_string();
                slot.status = AdStatus::Error;
                slot.last_error = Some(message.clone());
                self.publish(&slot);
                self.emit(AdSessionEvent::ShowFailed(message));

                self.schedule(&mut slot, self.config.show_retry_delay_ms, |shared| {
                    let retry = {
                        let slot = shared.lock();
                        slot.client.is_some() && slot.retry_count < shared.config.max_retries
                    };
                    if retry {
                        shared.load_ad();
                    }
                });
                false
            }
        }
    }

    fn dispose(&self) {
        let (timers, subscription, client) = {
            let mut slot = self.lock();
            if slot.disposed {
                return;
            }
            slot.disposed = true;
            slot.status = AdStatus::Idle;
            self.publish(&slot);
            (
                std::mem::take(&mut slot.timers),
                slot.subscription.take(),
                slot.client.take(),
            )
        };

        for timer in timers {
            timer.abort();
        }
        drop(subscription);
        drop(client);
        debug!("{} ad session disposed", self.kind.format());
    }
}
