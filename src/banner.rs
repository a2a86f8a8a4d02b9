//! Banner slot
//!
//! Banners have no lifecycle to manage here: the provider's banner view loads
//! and refreshes itself. This only resolves what the view should request.

use crate::error::{AdError, Result};
use crate::types::{Platform, RequestOptions, test_ids};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerSize {
    /// 320x50
    Banner,
    /// 320x100
    LargeBanner,
    /// 300x250
    MediumRectangle,
    /// 468x60
    FullBanner,
    /// 728x90
    Leaderboard,
    /// Full width, height chosen by the network
    #[default]
    AnchoredAdaptiveBanner,
}

impl BannerSize {
    /// Fixed size in dp, `None` for adaptive sizes
    pub fn dimensions(self) -> Option<(u32, u32)> {
        match self {
            BannerSize::Banner => Some((320, 50)),
            BannerSize::LargeBanner => Some((320, 100)),
            BannerSize::MediumRectangle => Some((300, 250)),
            BannerSize::FullBanner => Some((468, 60)),
            BannerSize::Leaderboard => Some((728, 90)),
            BannerSize::AnchoredAdaptiveBanner => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub unit_id: Option<String>,
    pub use_test_id: bool,
    pub request_non_personalized_ads_only: bool,
    pub platform: Platform,
    pub size: BannerSize,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            unit_id: None,
            use_test_id: cfg!(debug_assertions),
            request_non_personalized_ads_only: true,
            platform: Platform::current(),
            size: BannerSize::default(),
        }
    }
}

impl BannerConfig {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: Some(unit_id.into()),
            ..Default::default()
        }
    }

    pub fn use_test_id(mut self, enabled: bool) -> Self {
        self.use_test_id = enabled;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn size(mut self, size: BannerSize) -> Self {
        self.size = size;
        self
    }

    /// What the banner view should load
    pub fn request(&self) -> Result<BannerRequest> {
        if !self.platform.supports_ads() {
            return Err(AdError::Unsupported);
        }

        let unit_id = if self.use_test_id {
            test_ids::banner(self.platform).to_string()
        } else {
            match &self.unit_id {
                Some(id) if !id.trim().is_empty() => id.clone(),
                _ => {
                    return Err(AdError::InvalidConfig(
                        "banner unit_id is not set".to_string(),
                    ));
                }
            }
        };

        Ok(BannerRequest {
            unit_id,
            size: self.size,
            options: RequestOptions {
                request_non_personalized_ads_only: self.request_non_personalized_ads_only,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerRequest {
    pub unit_id: String,
    pub size: BannerSize,
    pub options: RequestOptions,
}
