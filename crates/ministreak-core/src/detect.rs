//! Host message classification.
//!
//! The host reports progress as free-text game messages, sometimes carrying
//! inline markup (`<col=ff0000>`, `<img=12>`). Each sub-task has a rule that
//! is matched against the tag-stripped, lowercased text.

use serde::{Deserialize, Serialize};

use crate::streak::SubTask;

/// Phrase-based matcher for one sub-task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Required prefix, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    /// Every phrase must appear.
    #[serde(default)]
    pub all_of: Vec<String>,
    /// Each group needs at least one of its phrases to appear.
    #[serde(default)]
    pub any_of: Vec<Vec<String>>,
}

impl MatchRule {
    /// A birdhouse trap filled with seed.
    pub fn birdhouse() -> Self {
        Self {
            starts_with: None,
            all_of: vec!["trap is now full".into()],
            any_of: vec![
                vec!["birdhouse".into(), "bird house".into()],
                vec![
                    "will start to catch birds".into(),
                    "will begin to catch birds".into(),
                ],
            ],
        }
    }

    /// A seed planted in a herb patch.
    pub fn herb_patch() -> Self {
        Self {
            starts_with: Some("you plant".into()),
            all_of: vec!["seed in the herb patch".into()],
            any_of: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.starts_with.as_deref().map_or(true, str::is_empty)
            && self.all_of.is_empty()
            && self.any_of.is_empty()
    }

    /// Match against already-normalized text (see [`normalize`]).
    pub fn matches(&self, text: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Some(prefix) = &self.starts_with {
            if !text.starts_with(&prefix.to_lowercase()) {
                return false;
            }
        }
        self.all_of
            .iter()
            .all(|phrase| text.contains(&phrase.to_lowercase()))
            && self.any_of.iter().all(|group| {
                group
                    .iter()
                    .any(|phrase| text.contains(&phrase.to_lowercase()))
            })
    }
}

/// Rules for both sub-tasks. Sub-task A is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRules {
    a: MatchRule,
    b: MatchRule,
}

impl DetectionRules {
    pub fn new(a: MatchRule, b: MatchRule) -> Self {
        Self { a, b }
    }

    pub fn rule(&self, task: SubTask) -> &MatchRule {
        match task {
            SubTask::A => &self.a,
            SubTask::B => &self.b,
        }
    }

    /// Which sub-task, if any, a raw host message reports.
    pub fn classify(&self, message: &str) -> Option<SubTask> {
        let text = normalize(message);
        SubTask::ALL
            .into_iter()
            .find(|task| self.rule(*task).matches(&text))
    }
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self::new(MatchRule::birdhouse(), MatchRule::herb_patch())
    }
}

/// Remove `<...>` markup tags. A `<` with no closing `>` is kept as text.
pub fn strip_tags(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Strip tags, lowercase and trim.
pub fn normalize(message: &str) -> String {
    strip_tags(message).trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_tags() {
        assert_eq!(strip_tags("<col=ff0000>Hello</col> <img=3>world"), "Hello world");
        assert_eq!(strip_tags("no tags"), "no tags");
        assert_eq!(strip_tags("a > b"), "a > b");
    }

    #[test]
    fn unclosed_angle_bracket_is_kept() {
        assert_eq!(strip_tags("I <3 birdhouses"), "I <3 birdhouses");
        assert_eq!(strip_tags("<col=ff0000>I</col> <3 herbs"), "I <3 herbs");
        assert_eq!(strip_tags("a <b> c < d"), "a  c < d");
    }

    #[test]
    fn classifies_birdhouse_messages() {
        let rules = DetectionRules::default();
        assert_eq!(
            rules.classify(
                "Your birdhouse trap is now full of seed and will start to catch birds."
            ),
            Some(SubTask::A)
        );
        assert_eq!(
            rules.classify(
                "<col=ef1020>Your bird house trap is now full of seed and will begin to catch birds.</col>"
            ),
            Some(SubTask::A)
        );
    }

    #[test]
    fn classifies_herb_messages() {
        let rules = DetectionRules::default();
        assert_eq!(
            rules.classify("You plant a Ranarr seed in the herb patch."),
            Some(SubTask::B)
        );
    }

    #[test]
    fn ignores_near_misses() {
        let rules = DetectionRules::default();
        assert_eq!(rules.classify("Your birdhouse trap is now full."), None);
        assert_eq!(
            rules.classify("The farmer says: you plant a seed in the herb patch."),
            None
        );
        assert_eq!(rules.classify(""), None);
    }

    #[test]
    fn empty_rule_never_matches() {
        assert!(!MatchRule::default().matches("anything"));
    }

    #[test]
    fn custom_rules_are_case_insensitive() {
        let rules = DetectionRules::new(
            MatchRule {
                starts_with: Some("Finished".into()),
                all_of: vec!["Lap".into()],
                any_of: vec![],
            },
            MatchRule::default(),
        );
        assert_eq!(rules.classify("finished lap 3"), Some(SubTask::A));
        assert_eq!(rules.classify("started lap 3"), None);
    }
}
