//! # quiz-ads
//!
//! Ad lifecycle management for a ten-question trivia game.
//!
//! ## Features
//!
//! - **Ad Sessions**: One lifecycle manager for interstitial and rewarded ads
//! - **Retry & Backoff**: Provider errors are retried with a growing delay
//! - **Throttle**: A minimum gap between two shown ads
//! - **Rewards**: Rewarded sessions forward each reward to a callback
//! - **Quiz**: Lives, score and an interstitial break at a score milestone
//!
//! ## Example
//!
//! ```rust,ignore
//! use quiz_ads::{AdConfig, AdSession, AdSessionEvent, SimulatedProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AdConfig::test();
//!
//!     let rewarded = AdSession::rewarded(SimulatedProvider::auto(), config, |kind, amount| {
//!         println!("Earned {} {}", amount, kind);
//!     });
//!
//!     while let Some(event) = rewarded.recv().await {
//!         if event == AdSessionEvent::Loaded {
//!             rewarded.show_ad().await;
//!         }
//!     }
//! }
//! ```

pub mod banner;
pub mod error;
pub mod home;
pub mod provider;
pub mod quiz;
pub mod session;
pub mod simulated;
pub mod spawn;
pub mod time;
pub mod types;


pub use banner::{BannerConfig, BannerRequest, BannerSize};
pub use error::{AdError, QuizError, Result};
pub use home::{Home, Turn};
pub use provider::{AdClient, AdEventHandler, AdProvider, Subscription};
pub use quiz::{AnswerOutcome, Question, QuestionBank, QuizConfig, QuizGame, QuizPhase};
pub use session::{AdKind, AdSession, RewardCallback};
pub use simulated::{SimBehavior, SimulatedClient, SimulatedProvider};
pub use types::*;
