//! Label heuristics as an ordered, configurable rule table.
//!
//! Each rule pairs a set of case-insensitive label substrings with an action:
//! - `answer`: fixed value applied before stored answers and generation
//! - `prefer_option`: option picked when generation yields nothing usable
//!
//! Rules of each action are evaluated in table order; the first match wins.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::resolver::options::find_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    Answer { value: String },
    PreferOption { containing: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub any_of: Vec<String>,
    #[serde(flatten)]
    pub action: RuleAction,
}

impl Rule {
    fn answer(name: &str, any_of: &[&str], value: &str) -> Self {
        Self {
            name: name.to_string(),
            any_of: any_of.iter().map(|k| k.to_string()).collect(),
            action: RuleAction::Answer {
                value: value.to_string(),
            },
        }
    }

    fn prefer(name: &str, any_of: &[&str], containing: &str) -> Self {
        Self {
            name: name.to_string(),
            any_of: any_of.iter().map(|k| k.to_string()).collect(),
            action: RuleAction::PreferOption {
                containing: containing.to_string(),
            },
        }
    }

    /// `label_lower` must already be lower-cased. A keyword has to start a
    /// word, so stems like `relocat` still match `relocation` while `race`
    /// does not match `embrace`.
    pub fn matches(&self, label_lower: &str) -> bool {
        self.any_of
            .iter()
            .any(|keyword| starts_word(label_lower, keyword))
    }
}

fn starts_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::answer(
                    "years_of_experience",
                    &["years of experience", "years of work experience", "how many years"],
                    "2",
                ),
                Rule::answer("notice_period", &["notice period"], "0"),
                Rule::answer("salary", &["salary"], "30000"),
                Rule::prefer(
                    "work_authorization",
                    &["visa", "sponsor", "right to work", "non-compete", "competitor"],
                    "no",
                ),
                Rule::prefer("mobility", &["remote", "commut", "relocat", "travel"], "yes"),
                Rule::prefer("disability", &["disability", "disabled"], "no"),
                Rule::prefer("veteran", &["veteran", "military"], "no"),
                Rule::prefer("demographics", &["gender", "ethnicity", "race"], "prefer not"),
            ],
        }
    }
}

impl RuleTable {
    /// Loads a table from JSON, e.g.
    /// `{"rules": [{"name": "salary", "any_of": ["salary"], "action": "answer", "value": "45000"}]}`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule table {}", path.display()))?;
        let table: RuleTable = serde_json::from_str(&raw)
            .with_context(|| format!("Rule table {} is not valid JSON", path.display()))?;
        let table = table.normalized()?;
        info!("Loaded {} answer rules from {}", table.rules.len(), path.display());
        Ok(table)
    }

    /// Lower-cases keywords and rejects rules that could never match.
    fn normalized(mut self) -> Result<Self> {
        for rule in &mut self.rules {
            rule.any_of = rule
                .any_of
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if rule.any_of.is_empty() {
                bail!("Rule '{}' has no keywords", rule.name);
            }
        }
        Ok(self)
    }

    /// First `answer` rule matching the label.
    pub fn fixed_answer(&self, label: &str) -> Option<(&Rule, &str)> {
        let label = label.to_lowercase();
        self.rules.iter().find_map(|rule| match &rule.action {
            RuleAction::Answer { value } if rule.matches(&label) => Some((rule, value.as_str())),
            _ => None,
        })
    }

    /// First `prefer_option` rule matching the label whose preferred option
    /// actually exists. Rules whose option is missing are skipped.
    pub fn preferred_option<'a>(
        &self,
        label: &str,
        options: &'a [String],
    ) -> Option<(&Rule, &'a str)> {
        let label = label.to_lowercase();
        self.rules.iter().find_map(|rule| match &rule.action {
            RuleAction::PreferOption { containing } if rule.matches(&label) => {
                find_option(options, containing).map(|option| (rule, option))
            }
            _ => None,
        })
    }
}
