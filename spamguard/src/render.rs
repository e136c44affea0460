//! Terminal presentation
//!
//! Renders prediction cards, token highlights, top contributors, the
//! history list and the about panel as plain text with optional ANSI color.

use std::fmt::Write;

use crate::constants::{APP_NAME, MODEL_INFO};
use crate::error::Result;
use crate::types::{HistoryItem, PredictionResult, ThemeMode, TokenExplanation};

/// Number of tokens shown in the contributor view
pub const TOP_CONTRIBUTORS: usize = 5;

const CONFIDENCE_BAR_WIDTH: usize = 20;
const CONTRIBUTOR_BAR_WIDTH: usize = 10;
const PREVIEW_CHARS: usize = 60;

/// Highlight intensity for a token score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HighlightLevel {
    None,
    Low,
    Medium,
    High,
}

impl HighlightLevel {
    /// Fixed thresholds: below 0.1 none, below 0.3 low, below 0.6 medium
    pub fn for_score(score: f64) -> Self {
        if score < 0.1 {
            Self::None
        } else if score < 0.3 {
            Self::Low
        } else if score < 0.6 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Highest-scoring tokens, descending, ties kept in message order
pub fn top_contributors(explanation: &[TokenExplanation], n: usize) -> Vec<&TokenExplanation> {
    let mut sorted: Vec<&TokenExplanation> = explanation.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

/// Text bar of `width` cells filled to `fraction`
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        single_line
    } else {
        let cut: String = single_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}

/// Terminal renderer
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    theme: ThemeMode,
    color: bool,
}

impl Renderer {
    pub fn new(theme: ThemeMode, color: bool) -> Self {
        Self { theme, color }
    }

    /// Renderer without escape codes
    pub fn plain() -> Self {
        Self::new(ThemeMode::Light, false)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn label_color(&self, is_spam: bool) -> &'static str {
        match (is_spam, self.theme) {
            (true, ThemeMode::Dark) => "1;91",
            (true, ThemeMode::Light) => "1;31",
            (false, ThemeMode::Dark) => "1;92",
            (false, ThemeMode::Light) => "1;32",
        }
    }

    /// Wrap a token according to its highlight level
    pub fn highlight_token(&self, item: &TokenExplanation) -> String {
        let level = HighlightLevel::for_score(item.score);

        if self.color {
            let code = match (level, self.theme) {
                (HighlightLevel::None, _) => return item.token.clone(),
                (HighlightLevel::Low, ThemeMode::Light) => "48;5;189",
                (HighlightLevel::Medium, ThemeMode::Light) => "48;5;147",
                (HighlightLevel::High, ThemeMode::Light) => "48;5;105",
                (HighlightLevel::Low, ThemeMode::Dark) => "48;5;60",
                (HighlightLevel::Medium, ThemeMode::Dark) => "48;5;61",
                (HighlightLevel::High, ThemeMode::Dark) => "48;5;62",
            };
            return self.paint(&item.token, code);
        }

        match level {
            HighlightLevel::None => item.token.clone(),
            HighlightLevel::Low => format!("[{}]", item.token),
            HighlightLevel::Medium => format!("[[{}]]", item.token),
            HighlightLevel::High => format!("[[[{}]]]", item.token),
        }
    }

    /// Highlighted message, optionally with each token's score
    pub fn token_analysis(&self, explanation: &[TokenExplanation], show_scores: bool) -> String {
        explanation
            .iter()
            .map(|item| {
                let token = self.highlight_token(item);
                if show_scores {
                    format!("{}({:.3})", token, item.score)
                } else {
                    token
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Full prediction card
    pub fn prediction_card(&self, result: &PredictionResult, show_scores: bool) -> String {
        let is_spam = result.label.is_spam();
        let percent = result.confidence_percent();
        let banner = if is_spam { "🚨 SPAM DETECTED" } else { "🛡️ NOT SPAM" };

        let mut out = String::new();
        let _ = writeln!(out, "Result:     {}", self.paint(banner, self.label_color(is_spam)));
        let _ = writeln!(
            out,
            "Confidence: {}% {}",
            percent,
            bar(result.probability, CONFIDENCE_BAR_WIDTH)
        );
        let _ = writeln!(out, "ID:         {}", result.id);
        let _ = writeln!(out, "Time:       {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Token Analysis:");
        let _ = writeln!(out, "  {}", self.token_analysis(&result.explanation, show_scores));
        let _ = writeln!(out);
        let _ = writeln!(out, "Top Contributors:");

        let top = top_contributors(&result.explanation, TOP_CONTRIBUTORS);
        if top.is_empty() {
            let _ = writeln!(out, "  (no tokens)");
        }
        for feat in top {
            let _ = writeln!(
                out,
                "  {:<16} {} {:.2}",
                feat.token,
                bar(feat.score, CONTRIBUTOR_BAR_WIDTH),
                feat.score
            );
        }

        out
    }

    /// One line per stored prediction
    pub fn history_list(&self, items: &[HistoryItem]) -> String {
        if items.is_empty() {
            return "No history yet.\n".to_string();
        }

        let mut out = String::new();
        for item in items {
            let label = format!("{:<4}", item.label.as_str().to_uppercase());
            let _ = writeln!(
                out,
                "{}  {}  {:>3}%  {}  {}",
                item.id,
                self.paint(&label, self.label_color(item.label.is_spam())),
                item.confidence_percent(),
                item.timestamp.format("%Y-%m-%d %H:%M"),
                preview(&item.original_text)
            );
        }
        let _ = writeln!(out, "\nTotal: {} prediction(s)", items.len());
        out
    }

    /// Static model information panel
    pub fn about(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} - Model Information", APP_NAME);
        let _ = writeln!(out);
        let _ = writeln!(out, "Current Model");
        let _ = writeln!(out, "  Name:      {}", MODEL_INFO.name);
        let _ = writeln!(out, "  Framework: {}", MODEL_INFO.framework);
        let _ = writeln!(out, "  Version:   {}", MODEL_INFO.version);
        let _ = writeln!(out, "  Accuracy:  {} on test set", MODEL_INFO.accuracy);
        let _ = writeln!(out);
        let _ = writeln!(out, "Training Data");
        let _ = writeln!(
            out,
            "  Trained on the {}, balanced using {}.",
            MODEL_INFO.dataset, MODEL_INFO.balance_method
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Explainability");
        let _ = writeln!(
            out,
            "  Positive token scores push towards spam; near-zero or negative scores are neutral or ham."
        );
        let _ = writeln!(
            out,
            "  When the backend is unreachable, a local keyword heuristic produces the result."
        );
        out
    }
}

/// Pretty JSON of a result, as copied to the clipboard
pub fn to_json(result: &PredictionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
