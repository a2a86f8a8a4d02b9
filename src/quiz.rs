//! Trivia game state
//!
//! Ten multiple-choice levels, three lives, ten points per correct answer.
//! Reaching the ad-break score asks the caller to show an interstitial.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    pub fn new(id: u32, question: &str, options: &[&str], answer: &str) -> Self {
        Self {
            id,
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    fn validate(&self) -> Result<(), QuizError> {
        if self.options.len() < 2 {
            return Err(QuizError::InvalidQuestion {
                id: self.id,
                reason: "needs at least two options".to_string(),
            });
        }
        if !self.options.contains(&self.answer) {
            return Err(QuizError::InvalidQuestion {
                id: self.id,
                reason: format!("answer {:?} is not one of the options", self.answer),
            });
        }
        Ok(())
    }
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        for q in &questions {
            q.validate()?;
        }
        Ok(Self { questions })
    }

    /// Load a bank from a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, level: usize) -> Option<&Question> {
        self.questions.get(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self {
            questions: vec![
                Question::new(
                    1,
                    "What is the capital of France?",
                    &["Paris", "Berlin", "Rome", "Madrid"],
                    "Paris",
                ),
                Question::new(2, "2 + 2 = ?", &["3", "4", "5", "6"], "4"),
                Question::new(
                    3,
                    "Which planet is known as the Red Planet?",
                    &["Earth", "Mars", "Jupiter", "Venus"],
                    "Mars",
                ),
                Question::new(
                    4,
                    "What is the boiling point of water?",
                    &["90°C", "100°C", "110°C", "120°C"],
                    "100°C",
                ),
                Question::new(
                    5,
                    "Who wrote “Romeo and Juliet”?",
                    &[
                        "Charles Dickens",
                        "Jane Austen",
                        "William Shakespeare",
                        "Mark Twain",
                    ],
                    "William Shakespeare",
                ),
                Question::new(
                    6,
                    "What is the largest ocean on Earth?",
                    &[
                        "Atlantic Ocean",
                        "Indian Ocean",
                        "Arctic Ocean",
                        "Pacific Ocean",
                    ],
                    "Pacific Ocean",
                ),
                Question::new(7, "5 x 6 = ?", &["30", "25", "20", "35"], "30"),
                Question::new(
                    8,
                    "What gas do plants absorb from the atmosphere?",
                    &["Oxygen", "Carbon Dioxide", "Hydrogen", "Nitrogen"],
                    "Carbon Dioxide",
                ),
                Question::new(
                    9,
                    "Which is the longest river in the world?",
                    &["Amazon", "Yangtze", "Nile", "Mississippi"],
                    "Nile",
                ),
                Question::new(
                    10,
                    "How many continents are there on Earth?",
                    &["5", "6", "7", "8"],
                    "7",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizPhase {
    #[default]
    Playing,
    Completed,
    GameOver,
}

/// Game rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Lives at the start of a game (default: 3)
    pub lives: u32,
    /// Points per correct answer (default: 10)
    pub points_per_answer: u32,
    /// Score at which an interstitial break is requested (default: 20)
    pub ad_break_score: Option<u32>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            points_per_answer: 10,
            ad_break_score: Some(20),
        }
    }
}

/// Result of answering the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct, moved on to the next level
    Correct { score: u32, ad_break: bool },
    /// Wrong, a life was lost
    Wrong { lives: u32 },
    /// Correct answer on the last level
    Completed { score: u32, ad_break: bool },
    /// Wrong answer with the last life
    GameOver { score: u32 },
}

impl AnswerOutcome {
    pub fn ad_break(&self) -> bool {
        matches!(
            self,
            AnswerOutcome::Correct { ad_break: true, .. }
                | AnswerOutcome::Completed { ad_break: true, .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct QuizGame {
    bank: QuestionBank,
    config: QuizConfig,
    current_level: usize,
    lives: u32,
    score: u32,
    phase: QuizPhase,
}

impl Default for QuizGame {
    fn default() -> Self {
        Self::new(QuestionBank::default(), QuizConfig::default())
    }
}

impl QuizGame {
    pub fn new(bank: QuestionBank, config: QuizConfig) -> Self {
        Self {
            bank,
            config,
            current_level: 0,
            lives: config.lives,
            score: 0,
            phase: QuizPhase::Playing,
        }
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.bank.len()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Question being asked, `None` once the game is over
    pub fn current(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Playing => self.bank.get(self.current_level),
            _ => None,
        }
    }

    pub fn answer(&mut self, option: &str) -> Result<AnswerOutcome, QuizError> {
        let question = self.current().ok_or(QuizError::Finished)?;

        if question.is_correct(option) {
            self.score += self.config.points_per_answer;
            let ad_break = self.config.ad_break_score == Some(self.score);

            if self.current_level + 1 < self.bank.len() {
                self.current_level += 1;
                Ok(AnswerOutcome::Correct {
                    score: self.score,
                    ad_break,
                })
            } else {
                self.phase = QuizPhase::Completed;
                Ok(AnswerOutcome::Completed {
                    score: self.score,
                    ad_break,
                })
            }
        } else if self.lives > 1 {
            self.lives -= 1;
            Ok(AnswerOutcome::Wrong { lives: self.lives })
        } else {
            self.lives = 0;
            self.phase = QuizPhase::GameOver;
            Ok(AnswerOutcome::GameOver { score: self.score })
        }
    }

    pub fn reset(&mut self) {
        self.current_level = 0;
        self.lives = self.config.lives;
        self.score = 0;
        self.phase = QuizPhase::Playing;
    }
}
