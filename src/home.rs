//! Home - the game screen's controller

use crate::banner::{BannerConfig, BannerRequest};
use crate::error::{QuizError, Result};
use crate::provider::AdProvider;
use crate::quiz::{AnswerOutcome, QuizGame};
use crate::session::AdSession;
use crate::types::AdConfig;
use tracing::info;

/// Outcome of one answered question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub outcome: AnswerOutcome,
    /// An interstitial was shown as the ad break
    pub ad_shown: bool,
}

/// Quiz game with an interstitial ad break and a banner
pub struct Home<P: AdProvider> {
    game: QuizGame,
    interstitial: AdSession<P>,
    banner: BannerConfig,
}

impl<P: AdProvider> Home<P> {
    /// Must be called inside a tokio runtime
    pub fn new(provider: P, ad_config: AdConfig, banner: BannerConfig, game: QuizGame) -> Self {
        Self {
            game,
            interstitial: AdSession::interstitial(provider, ad_config),
            banner,
        }
    }

    pub fn game(&self) -> &QuizGame {
        &self.game
    }

    pub fn interstitial(&self) -> &AdSession<P> {
        &self.interstitial
    }

    pub fn banner(&self) -> Result<BannerRequest> {
        self.banner.request()
    }

    /// Answer the current question, showing the ad break when it comes due
    pub async fn answer(&mut self, option: &str) -> std::result::Result<Turn, QuizError> {
        let outcome = self.game.answer(option)?;

        let mut ad_shown = false;
        if outcome.ad_break() && self.interstitial.is_loaded() {
            info!("Ad break at score {}", self.game.score());
            ad_shown = self.interstitial.show_ad().await;
        }

        Ok(Turn { outcome, ad_shown })
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }
}
