//! In-process ad provider
//!
//! Stands in for the ad network SDK in demos and tests. In manual mode
//! nothing happens on its own: callers drive the client by emitting events.
//! In auto mode loads fill and shown ads close after short delays.

use crate::error::{AdError, Result};
use crate::provider::{AdClient, AdEventHandler, AdProvider, Subscription};
use crate::spawn::spawn;
use crate::time::sleep_ms;
use crate::types::{AdEvent, AdFormat, RequestOptions, RewardPayload};
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Automatic behavior of simulated clients
#[derive(Debug, Clone, Default)]
pub struct SimBehavior {
    /// Emit `Loaded` this many ms after `load()`
    pub auto_fill_ms: Option<u64>,
    /// Emit `Closed` this many ms after a successful `show()`
    pub auto_close_ms: Option<u64>,
    /// Reward granted before closing, rewarded clients only
    pub reward: Option<RewardPayload>,
}

#[derive(Default)]
struct ProviderState {
    behavior: SimBehavior,
    clients: Vec<SimulatedClient>,
    initialized: bool,
    fail_next_create: Option<String>,
}

/// Simulated ad network SDK
#[derive(Clone, Default)]
pub struct SimulatedProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl SimulatedProvider {
    /// Provider whose clients only act when told to
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose clients fill, close and reward on their own
    pub fn auto() -> Self {
        Self::with_behavior(SimBehavior {
            auto_fill_ms: Some(500),
            auto_close_ms: Some(1_500),
            reward: Some(RewardPayload::new("coin", 5)),
        })
    }

    pub fn with_behavior(behavior: SimBehavior) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                behavior,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Most recently created client
    pub fn client(&self) -> Option<SimulatedClient> {
        self.lock().clients.last().cloned()
    }

    /// All clients created so far
    pub fn clients(&self) -> Vec<SimulatedClient> {
        self.lock().clients.clone()
    }

    /// Make the next `create_for_ad_request` fail
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.lock().fail_next_create = Some(message.into());
    }
}

impl AdProvider for SimulatedProvider {
    type Client = SimulatedClient;

    fn initialize(&self) -> impl Future<Output = Result<()>> + Send {
        self.lock().initialized = true;
        debug!("Simulated ad SDK initialized");
        async { Ok(()) }
    }

    fn create_for_ad_request(
        &self,
        format: AdFormat,
        unit_id: &str,
        options: &RequestOptions,
    ) -> Result<SimulatedClient> {
        let mut state = self.lock();
        if let Some(message) = state.fail_next_create.take() {
            return Err(AdError::Provider(message));
        }

        let client = SimulatedClient {
            inner: Arc::new(ClientInner {
                format,
                unit_id: unit_id.to_string(),
                options: *options,
                behavior: state.behavior.clone(),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                load_calls: AtomicUsize::new(0),
                show_calls: AtomicUsize::new(0),
                fail_next_load: Mutex::new(None),
                fail_next_show: Mutex::new(None),
            }),
        };
        state.clients.push(client.clone());
        debug!("Simulated {} client created for {}", format, unit_id);
        Ok(client)
    }
}

struct ClientInner {
    format: AdFormat,
    unit_id: String,
    options: RequestOptions,
    behavior: SimBehavior,
    listeners: Mutex<Vec<(u64, AdEventHandler)>>,
    next_listener_id: AtomicU64,
    load_calls: AtomicUsize,
    show_calls: AtomicUsize,
    fail_next_load: Mutex<Option<String>>,
    fail_next_show: Mutex<Option<String>>,
}

impl ClientInner {
    fn emit(&self, event: AdEvent) {
        // Snapshot so handlers may subscribe or unsubscribe while running
        let handlers: Vec<AdEventHandler> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(event.clone());
        }
    }

    fn take_failure(slot: &Mutex<Option<String>>) -> Option<String> {
        slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Simulated ad object for one slot
#[derive(Clone)]
pub struct SimulatedClient {
    inner: Arc<ClientInner>,
}

impl SimulatedClient {
    pub fn format(&self) -> AdFormat {
        self.inner.format
    }

    pub fn unit_id(&self) -> &str {
        &self.inner.unit_id
    }

    pub fn options(&self) -> RequestOptions {
        self.inner.options
    }

    pub fn load_calls(&self) -> usize {
        self.inner.load_calls.load(Ordering::SeqCst)
    }

    pub fn show_calls(&self) -> usize {
        self.inner.show_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an event to every listener, synchronously
    pub fn emit(&self, event: AdEvent) {
        self.inner.emit(event);
    }

    /// Make the next `load()` return an error
    pub fn fail_next_load(&self, message: impl Into<String>) {
        *self
            .inner
            .fail_next_load
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Make the next `show()` resolve with an error
    pub fn fail_next_show(&self, message: impl Into<String>) {
        *self
            .inner
            .fail_next_show
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }
}

impl AdClient for SimulatedClient {
    fn load(&self) -> Result<()> {
        self.inner.load_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = ClientInner::take_failure(&self.inner.fail_next_load) {
            return Err(AdError::Load(message));
        }

        if let Some(ms) = self.inner.behavior.auto_fill_ms {
            let inner = self.inner.clone();
            spawn(async move {
                sleep_ms(ms).await;
                inner.emit(AdEvent::Loaded);
            });
        }
        Ok(())
    }

    fn show(&self) -> impl Future<Output = Result<()>> + Send {
        let inner = self.inner.clone();
        async move {
            inner.show_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = ClientInner::take_failure(&inner.fail_next_show) {
                return Err(AdError::Show(message));
            }

            if let Some(ms) = inner.behavior.auto_close_ms {
                let inner = inner.clone();
                spawn(async move {
                    sleep_ms(ms).await;
                    if inner.format == AdFormat::Rewarded {
                        if let Some(reward) = inner.behavior.reward.clone() {
                            inner.emit(AdEvent::EarnedReward(reward));
                        }
                    }
                    inner.emit(AdEvent::Closed);
                });
            }
            Ok(())
        }
    }

    fn add_ad_event_listener(&self, handler: AdEventHandler) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }
}
