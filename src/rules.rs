//! Rule-parsing collaborator.
//!
//! Free-text augmentation is interpreted by an external service. This module
//! defines the contract, maps every failure mode into a
//! [`CollaboratorFailure`], and ships a deterministic local stand-in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::GENERIC_RULE_FAILURE;
use crate::error::CollaboratorFailure;
use crate::model::AlarmLevel;

/// Result returned by the rule parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub object_name: String,
    pub action_description: String,
    /// Suggested alarm duration in seconds
    pub suggested_duration: u32,
    pub suggested_level: AlarmLevel,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ParsedRule {
    /// A rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            object_name: String::new(),
            action_description: String::new(),
            suggested_duration: 0,
            suggested_level: AlarmLevel::default(),
            valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Decode a service response.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Transport-level failures talking to the parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The service could not be reached or answered with an error
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not a valid rule
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Contract of the rule-parsing collaborator.
pub trait RuleParser {
    /// Interpret a free-text rule description.
    fn parse(&self, text: &str) -> Result<ParsedRule, ParseError>;
}

/// Call the parser once and fold every failure into a [`CollaboratorFailure`].
///
/// Transport errors are treated exactly like a `valid = false` answer without
/// a reason: both surface the generic fallback message.
pub fn resolve_rule(parser: &dyn RuleParser, text: &str) -> Result<ParsedRule, CollaboratorFailure> {
    match parser.parse(text) {
        Ok(rule) if rule.valid => {
            log::debug!(
                "🧠 Rule parsed: object='{}' duration={}s level={}",
                rule.object_name,
                rule.suggested_duration,
                rule.suggested_level.name()
            );
            Ok(rule)
        }
        Ok(rule) => {
            let reason = rule
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| GENERIC_RULE_FAILURE.to_string());
            log::warn!("Rule rejected: {}", reason);
            Err(CollaboratorFailure::new(reason))
        }
        Err(e) => {
            log::warn!("Rule parser failed: {}", e);
            Err(CollaboratorFailure::new(GENERIC_RULE_FAILURE))
        }
    }
}

// ============================================================================
// Local stand-in
// ============================================================================

const OBJECT_WORDS: &[(&str, &str)] = &[
    ("person", "person"),
    ("people", "person"),
    ("worker", "person"),
    ("vehicle", "vehicle"),
    ("car", "vehicle"),
    ("truck", "vehicle"),
    ("fire", "fire"),
    ("smoke", "smoke"),
    ("helmet", "helmet"),
    ("bag", "bag"),
];

const HIGH_WORDS: &[&str] = &["urgent", "critical", "immediately", "danger"];
const LOW_WORDS: &[&str] = &["minor", "low", "info"];

/// Deterministic keyword-based parser used when no remote service is wired in.
#[derive(Debug, Clone)]
pub struct SimulatedRuleParser {
    /// Duration suggested when the text names none
    pub default_duration: u32,
}

impl Default for SimulatedRuleParser {
    fn default() -> Self {
        Self {
            default_duration: crate::constants::DEFAULT_TASK_DURATION_SECS,
        }
    }
}

impl SimulatedRuleParser {
    fn duration_in(&self, words: &[String]) -> u32 {
        for (i, word) in words.iter().enumerate() {
            let digits: String = word.chars().take_while(char::is_ascii_digit).collect();
            let Ok(value) = digits.parse::<u32>() else {
                continue;
            };
            let unit = if digits.len() < word.len() {
                word[digits.len()..].to_string()
            } else {
                words.get(i + 1).cloned().unwrap_or_default()
            };
            return if unit.starts_with("min") || unit == "m" {
                value.saturating_mul(60)
            } else {
                value
            };
        }
        self.default_duration
    }
}

impl RuleParser for SimulatedRuleParser {
    fn parse(&self, text: &str) -> Result<ParsedRule, ParseError> {
        let lowered = text.to_lowercase();
        let words: Vec<String> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            return Ok(ParsedRule::rejected("Rule description is empty"));
        }

        let Some(object) = words
            .iter()
            .find_map(|w| OBJECT_WORDS.iter().find(|(k, _)| k == w).map(|(_, v)| *v))
        else {
            return Ok(ParsedRule::rejected(
                "Could not identify an object to detect in the description",
            ));
        };

        let level = if words.iter().any(|w| HIGH_WORDS.contains(&w.as_str())) {
            AlarmLevel::High
        } else if words.iter().any(|w| LOW_WORDS.contains(&w.as_str())) {
            AlarmLevel::Low
        } else {
            AlarmLevel::Medium
        };

        Ok(ParsedRule {
            object_name: object.to_string(),
            action_description: text.trim().to_string(),
            suggested_duration: self.duration_in(&words).max(1),
            suggested_level: level,
            valid: true,
            reason: None,
        })
    }
}
