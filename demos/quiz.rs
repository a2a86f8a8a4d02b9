//! Terminal play-through of the quiz with simulated ads

use quiz_ads::{
    AdConfig, AdProvider, AdSession, AnswerOutcome, BannerConfig, Home, QuizGame, QuizPhase,
    SimulatedProvider,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("quiz-ads demo");
    println!("=============\n");

    let provider = SimulatedProvider::auto();
    provider.initialize().await?;

    // The demo runs on a desktop terminal, pretend to be a phone
    let ads = AdConfig::test()
        .platform(quiz_ads::Platform::Android)
        .init_delay(200)
        .preload_delay(300);
    let banner = BannerConfig::default()
        .use_test_id(true)
        .platform(quiz_ads::Platform::Android);

    let rewarded = AdSession::rewarded(provider.clone(), ads.clone(), |kind, amount| {
        println!("[Reward] +{} {}", amount, kind);
    });
    let mut home = Home::new(provider, ads, banner, QuizGame::default());

    let request = home.banner()?;
    println!("[Banner] {} ({:?})\n", request.unit_id, request.size);

    println!("Commands:");
    println!("  <number> - Pick an option");
    println!("  w - Watch a rewarded ad");
    println!("  r - Restart");
    println!("  q - Quit\n");

    loop {
        while let Some(event) = home.interstitial().try_recv() {
            println!("[Interstitial] {:?}", event);
        }
        while let Some(event) = rewarded.try_recv() {
            println!("[Rewarded] {:?}", event);
        }

        let game = home.game();
        match game.phase() {
            QuizPhase::Completed => println!("You completed all levels! Score: {}", game.score()),
            QuizPhase::GameOver => println!("Game Over. Score: {}", game.score()),
            QuizPhase::Playing => {
                if let Some(question) = game.current() {
                    println!(
                        "Level {}/{}  Lives: {}  Score: {}",
                        game.current_level() + 1,
                        game.level_count(),
                        game.lives(),
                        game.score()
                    );
                    println!("{}", question.question);
                    for (i, option) in question.options.iter().enumerate() {
                        println!("  {}. {}", i + 1, option);
                    }
                }
            }
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "q" => break,
            "r" => home.reset(),
            "w" => {
                if !rewarded.show_ad().await {
                    println!("No rewarded ad available yet");
                }
            }
            _ => {
                let option = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| home.game().current()?.options.get(i).cloned());

                let Some(option) = option else {
                    println!("Unknown command: {}", input);
                    continue;
                };

                match home.answer(&option).await {
                    Ok(turn) => {
                        match turn.outcome {
                            AnswerOutcome::Correct { .. } | AnswerOutcome::Completed { .. } => {
                                println!("Correct!")
                            }
                            AnswerOutcome::Wrong { lives } => println!("Wrong! {} lives left", lives),
                            AnswerOutcome::GameOver { .. } => println!("Wrong! No lives left"),
                        }
                        if turn.ad_shown {
                            println!("[Ad break] Interstitial shown");
                        }
                    }
                    Err(e) => println!("[Error] {}", e),
                }
            }
        }
        println!();
    }

    Ok(())
}
