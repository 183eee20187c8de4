use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Position wishes the planner understands, in matching priority order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PositionRule {
    Forward,
    Backward,
    Window,
    Aisle,
}

impl PositionRule {
    pub const PRIORITY: [PositionRule; 4] = [
        PositionRule::Forward,
        PositionRule::Backward,
        PositionRule::Window,
        PositionRule::Aisle,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            PositionRule::Forward => &["forward", "vorne"],
            PositionRule::Backward => &["backward", "hinten"],
            PositionRule::Window => &["window", "fenster"],
            PositionRule::Aisle => &["aisle", "gang"],
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PositionRule::Forward => "front of the vehicle",
            PositionRule::Backward => "rear of the vehicle",
            PositionRule::Window => "window seat",
            PositionRule::Aisle => "aisle seat",
        }
    }

    /// Case-insensitive substring match against any keyword
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords().iter().any(|keyword| text.contains(keyword))
    }

    /// Rules whose keywords occur in `text`, in priority order
    pub fn matching(text: &str) -> Vec<PositionRule> {
        Self::PRIORITY
            .into_iter()
            .filter(|rule| rule.matches(text))
            .collect()
    }
}

fn companion_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Keyword is case-insensitive; the name runs until the first lowercase word
        Regex::new(r"\b(?i:with|next\s+to|mit|neben)\s+(\p{L}[\p{L}'-]*(?:\s+\p{Lu}[\p{L}'-]*)*)")
            .expect("companion pattern is a valid regex")
    })
}

/// Extracts the companion's name from texts like "next to Anna Schmidt"
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanionMatcher;

impl CompanionMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn target_name(&self, text: &str) -> Option<String> {
        let captures = companion_pattern().captures(text)?;
        let name = captures
            .get(1)?
            .as_str()
            .trim_end_matches(|c: char| matches!(c, '\'' | '-'));

        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Does `candidate` contain the wanted name, ignoring case
    pub fn names_match(wanted: &str, candidate: &str) -> bool {
        candidate.to_lowercase().contains(&wanted.to_lowercase())
    }
}
