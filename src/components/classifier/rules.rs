use super::policy::{ClassificationPolicy, PolicyExample, RuleMatch};
use super::Classifier;
use crate::components::event::CalendarEvent;
use crate::error::VahtiResult;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Evidence pointing towards spam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamSignal {
    IllegitimateDomain,
    VagueDescription,
    ResemblesSpamExample,
}

/// Evidence pointing towards a legitimate booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegitSignal {
    TrustedDomain,
    ContextualDescription,
    MentionsKeyword,
    ResemblesLegitExample,
}

/// Result of evaluating the policy against one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub spam_signals: Vec<SpamSignal>,
    pub legit_signals: Vec<LegitSignal>,
    pub is_spam: bool,
}

/// Deterministic classifier that evaluates a [`ClassificationPolicy`] locally.
///
/// Only admissible fields contribute evidence. With `spam_match = "any"` a
/// single spam signal flags the event; with `"all"` every spam signal must fire.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    policy: ClassificationPolicy,
}

impl RuleClassifier {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    /// Evaluate every rule and report the evidence
    pub fn assess(&self, event: &CalendarEvent) -> Assessment {
        let policy = &self.policy;
        let mut spam_signals = Vec::new();
        let mut legit_signals = Vec::new();
        // Rules tied to a field that is not admissible are skipped entirely
        let mut evaluated = 0usize;

        if policy.admits("invitee_email") {
            evaluated += 1;
            if is_legitimate_domain(event.invitee_email(), &policy.trusted_tlds) {
                legit_signals.push(LegitSignal::TrustedDomain);
            } else {
                spam_signals.push(SpamSignal::IllegitimateDomain);
            }
        }

        if policy.admits("description") {
            let description = event.description();
            let words = word_count(description);

            evaluated += 2;
            if words <= policy.max_vague_words || !description.chars().any(char::is_alphabetic) {
                spam_signals.push(SpamSignal::VagueDescription);
            } else {
                legit_signals.push(LegitSignal::ContextualDescription);
            }
            if resembles_any(description, &policy.spam_examples, policy.similarity_threshold) {
                spam_signals.push(SpamSignal::ResemblesSpamExample);
            }

            if mentions_keyword(description, &policy.legit_keywords) {
                legit_signals.push(LegitSignal::MentionsKeyword);
            }
            if resembles_any(description, &policy.legit_examples, policy.similarity_threshold) {
                legit_signals.push(LegitSignal::ResemblesLegitExample);
            }
        }

        let is_spam = match policy.spam_match {
            RuleMatch::Any => !spam_signals.is_empty(),
            RuleMatch::All => evaluated > 0 && spam_signals.len() == evaluated,
        };

        Assessment {
            spam_signals,
            legit_signals,
            is_spam,
        }
    }
}

#[async_trait]
impl Classifier for RuleClassifier {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn classify(&self, event: &CalendarEvent) -> VahtiResult<bool> {
        let assessment = self.assess(event);
        debug!(
            event_id = event.event_id(),
            spam_signals = ?assessment.spam_signals,
            legit_signals = ?assessment.legit_signals,
            "Rule engine assessment"
        );
        Ok(assessment.is_spam)
    }
}

/// Check the email address for a well-formed domain under a trusted TLD
pub fn is_legitimate_domain(email: &str, trusted_tlds: &[String]) -> bool {
    let Some((local, domain)) = email.trim().rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let well_formed = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    well_formed && trusted_tlds.iter().any(|t| t.eq_ignore_ascii_case(tld))
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Jaccard similarity of the lowercase word sets
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = tokens(a);
    let b = tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(&b).count() as f64;
    let total = a.union(&b).count() as f64;
    shared / total
}

fn resembles_any(description: &str, examples: &[PolicyExample], threshold: f64) -> bool {
    examples
        .iter()
        .any(|example| similarity(description, &example.description) >= threshold)
}

fn mentions_keyword(description: &str, keywords: &[String]) -> bool {
    let lower = description.to_lowercase();
    keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
}
