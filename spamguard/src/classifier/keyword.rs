//! Keyword fallback classifier
//!
//! Scores whitespace-delimited tokens against a fixed keyword list. Keyword
//! hits push the spam probability up by a fixed step; every token gets a
//! randomized explanation score. Randomness comes from an owned [`StdRng`]
//! so results are reproducible when the classifier is seeded.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::Classifier;
use crate::config::FallbackConfig;
use crate::error::Result;
use crate::types::{Label, PredictionResult, TokenExplanation};

/// Default spam keywords
pub const DEFAULT_KEYWORDS: [&str; 9] = [
    "win",
    "winner",
    "free",
    "prize",
    "urgent",
    "cash",
    "claim",
    "guaranteed",
    "offer",
];

/// Probability added per keyword occurrence
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.2;

/// Default simulated latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1200);

const MIN_PROBABILITY: f64 = 0.01;
const MAX_PROBABILITY: f64 = 0.99;

/// Strip everything outside `[A-Za-z0-9]` and lower-case the rest
pub fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Output of a scoring pass
#[derive(Debug, Clone)]
pub struct TokenScores {
    /// One entry per token, in message order
    pub explanation: Vec<TokenExplanation>,
    /// Accumulated keyword weight, before jitter and clamping
    pub spam_score: f64,
    /// Number of tokens that matched a keyword
    pub keyword_hits: usize,
}

/// Token scorer
#[derive(Debug, Clone)]
pub struct TokenScorer {
    keywords: HashSet<String>,
    weight: f64,
}

impl TokenScorer {
    pub fn new<I, S>(keywords: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_ascii_lowercase())
                .collect(),
            weight,
        }
    }

    /// Check whether a raw token matches a keyword once cleaned
    pub fn is_keyword(&self, token: &str) -> bool {
        self.keywords.contains(&clean_token(token))
    }

    /// Score every token of `text`
    pub fn score<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> TokenScores {
        let mut spam_score = 0.0;
        let mut keyword_hits = 0;
        let mut explanation = Vec::new();

        for token in text.split_whitespace() {
            let score = if self.is_keyword(token) {
                spam_score += self.weight;
                keyword_hits += 1;
                rng.gen_range(0.8..1.0)
            } else {
                rng.gen_range(0.0..0.1)
            };

            explanation.push(TokenExplanation {
                token: token.to_string(),
                score,
            });
        }

        TokenScores {
            explanation,
            spam_score,
            keyword_hits,
        }
    }
}

impl Default for TokenScorer {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS, DEFAULT_KEYWORD_WEIGHT)
    }
}

/// Local keyword classifier
pub struct KeywordClassifier {
    scorer: TokenScorer,
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl KeywordClassifier {
    /// Default keywords, entropy-seeded, default latency
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Default keywords with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            scorer: TokenScorer::default(),
            rng: Mutex::new(rng),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scorer: TokenScorer::new(&config.keywords, config.keyword_weight),
            rng: Mutex::new(rng),
            latency: config.latency(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_scorer(mut self, scorer: TokenScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Classify without the simulated delay
    pub fn classify_now(&self, text: &str) -> PredictionResult {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let scores = self.scorer.score(text, &mut *rng);
        let jitter: f64 = rng.gen_range(0.0..0.1);
        let probability = (scores.spam_score + jitter).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
        let label = Label::from_probability(probability);

        debug!(
            tokens = scores.explanation.len(),
            keyword_hits = scores.keyword_hits,
            spam_score = scores.spam_score,
            probability,
            label = %label,
            "keyword classifier scored message"
        );

        PredictionResult::new(label, probability, scores.explanation, text)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<PredictionResult> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.classify_now(text))
    }

    fn name(&self) -> &str {
        "keyword-fallback"
    }
}
