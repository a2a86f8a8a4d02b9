//! Type definitions for quiz-ads

use crate::error::{AdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Published sample ad unit ids that always fill with test creatives
pub mod test_ids {
    use super::{AdFormat, Platform};

    pub const ANDROID_BANNER: &str = "ca-app-pub-3940256099942544/6300978111";
    pub const ANDROID_INTERSTITIAL: &str = "ca-app-pub-3940256099942544/1033173712";
    pub const ANDROID_REWARDED: &str = "ca-app-pub-3940256099942544/5224354917";

    pub const IOS_BANNER: &str = "ca-app-pub-3940256099942544/2934735716";
    pub const IOS_INTERSTITIAL: &str = "ca-app-pub-3940256099942544/4411468910";
    pub const IOS_REWARDED: &str = "ca-app-pub-3940256099942544/1712485313";

    /// Test unit id for a full-screen format
    pub fn for_format(format: AdFormat, platform: Platform) -> &'static str {
        match (format, platform) {
            (AdFormat::Interstitial, Platform::Ios) => IOS_INTERSTITIAL,
            (AdFormat::Rewarded, Platform::Ios) => IOS_REWARDED,
            (AdFormat::Interstitial, _) => ANDROID_INTERSTITIAL,
            (AdFormat::Rewarded, _) => ANDROID_REWARDED,
        }
    }

    /// Test unit id for banners
    pub fn banner(platform: Platform) -> &'static str {
        match platform {
            Platform::Ios => IOS_BANNER,
            _ => ANDROID_BANNER,
        }
    }
}

/// Full-screen ad format managed by an [`AdSession`](crate::AdSession)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    /// Shown at a natural transition point
    Interstitial,
    /// Grants an in-app reward once watched to the end
    Rewarded,
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdFormat::Interstitial => f.write_str("interstitial"),
            AdFormat::Rewarded => f.write_str("rewarded"),
        }
    }
}

/// Runtime target the game is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
    Desktop,
}

impl Platform {
    /// Platform of the current build target
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else {
            Platform::Desktop
        }
    }

    /// Whether the native ad surface exists on this platform
    pub fn supports_ads(self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Ad slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Showing,
    Error,
}

/// Options forwarded to the provider with every ad request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub request_non_personalized_ads_only: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            request_non_personalized_ads_only: true,
        }
    }
}

/// Ad session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdConfig {
    /// Production ad unit id
    pub unit_id: Option<String>,
    /// Use the published test unit id instead of `unit_id` (default: debug builds)
    pub use_test_id: bool,
    /// Only request non-personalized ads (default: true)
    pub request_non_personalized_ads_only: bool,
    /// Runtime target (default: the build target)
    pub platform: Platform,
    /// Automatic load retries after provider errors (default: 3)
    pub max_retries: u32,
    /// Minimum gap between two shown ads in ms (default: 60000)
    pub min_interval_ms: u64,
    /// Debounce before the provider client is created in ms (default: 2000)
    pub init_delay_ms: u64,
    /// Delay between client creation and the first load in ms (default: 3000)
    pub preload_delay_ms: u64,
    /// Retry backoff step in ms, multiplied by the retry count (default: 3000)
    pub retry_backoff_ms: u64,
    /// Reload delay after the ad is closed in ms (default: 10000)
    pub close_reload_delay_ms: u64,
    /// Reload delay after a failed show in ms (default: 5000)
    pub show_retry_delay_ms: u64,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            unit_id: None,
            use_test_id: cfg!(debug_assertions),
            request_non_personalized_ads_only: true,
            platform: Platform::current(),
            max_retries: 3,
            min_interval_ms: 60_000,
            init_delay_ms: 2_000,
            preload_delay_ms: 3_000,
            retry_backoff_ms: 3_000,
            close_reload_delay_ms: 10_000,
            show_retry_delay_ms: 5_000,
        }
    }
}

impl AdConfig {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: Some(unit_id.into()),
            ..Default::default()
        }
    }

    /// Config that always requests test creatives
    pub fn test() -> Self {
        Self {
            use_test_id: true,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn use_test_id(mut self, enabled: bool) -> Self {
        self.use_test_id = enabled;
        self
    }

    pub fn non_personalized(mut self, enabled: bool) -> Self {
        self.request_non_personalized_ads_only = enabled;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn min_interval(mut self, ms: u64) -> Self {
        self.min_interval_ms = ms;
        self
    }

    pub fn init_delay(mut self, ms: u64) -> Self {
        self.init_delay_ms = ms;
        self
    }

    pub fn preload_delay(mut self, ms: u64) -> Self {
        self.preload_delay_ms = ms;
        self
    }

    pub fn retry_backoff(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn close_reload_delay(mut self, ms: u64) -> Self {
        self.close_reload_delay_ms = ms;
        self
    }

    pub fn show_retry_delay(mut self, ms: u64) -> Self {
        self.show_retry_delay_ms = ms;
        self
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            request_non_personalized_ads_only: self.request_non_personalized_ads_only,
        }
    }

    /// Unit id to request ads for, honoring the test id switch
    pub fn resolve_unit_id(&self, format: AdFormat) -> Result<String> {
        if self.use_test_id {
            return Ok(test_ids::for_format(format, self.platform).to_string());
        }
        self.unit_id.clone().ok_or(AdError::MissingUnitId(format))
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(&self.unit_id, Some(id) if id.trim().is_empty()) {
            return Err(AdError::InvalidConfig("unit_id is empty".to_string()));
        }
        if self.max_retries > 0 && self.retry_backoff_ms == 0 {
            return Err(AdError::InvalidConfig(
                "retry_backoff_ms must be non-zero when retries are enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reward granted by a rewarded ad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPayload {
    #[serde(rename = "type")]
    pub reward_type: String,
    pub amount: u32,
}

impl RewardPayload {
    pub fn new(reward_type: impl Into<String>, amount: u32) -> Self {
        Self {
            reward_type: reward_type.into(),
            amount,
        }
    }
}

/// Events emitted by a provider ad client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdEvent {
    Loaded,
    Error(String),
    Closed,
    EarnedReward(RewardPayload),
}

/// Observable state of an ad session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdSnapshot {
    pub status: AdStatus,
    pub is_loaded: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub retry_count: u32,
}

/// Events emitted by an ad session to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdSessionEvent {
    /// Provider client created and listening
    Initialized,
    /// An ad is ready to show
    Loaded,
    /// Loading failed
    LoadFailed { message: String, retry_count: u32 },
    /// A reload was scheduled
    RetryScheduled { attempt: u32, delay_ms: u64 },
    /// Automatic retries are used up
    RetriesExhausted,
    /// The ad was displayed
    Shown,
    /// Displaying the ad failed
    ShowFailed(String),
    /// Show rejected because the last ad was too recent
    Throttled { remaining_ms: u64 },
    /// The user dismissed the ad
    Closed,
    /// The user earned a reward
    Reward(RewardPayload),
}
