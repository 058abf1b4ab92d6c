use crate::error::{config_error, VahtiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event fields a classifier is allowed to look at
pub const KNOWN_FIELDS: [&str; 5] = [
    "description",
    "created_date",
    "event_name",
    "invitee_email",
    "event_id",
];

/// How the spam criteria are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMatch {
    /// One matching criterion is enough
    Any,
    /// Every criterion has to match
    All,
}

impl RuleMatch {
    fn as_phrase(self) -> &'static str {
        match self {
            RuleMatch::Any => "ANY",
            RuleMatch::All => "ALL",
        }
    }
}

/// A literal example embedded in the instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExample {
    pub email: String,
    pub description: String,
}

impl PolicyExample {
    fn new(email: &str, description: &str) -> Self {
        Self {
            email: email.to_string(),
            description: description.to_string(),
        }
    }
}

/// Spam policy shared by the Gemini agent and the rule engine.
///
/// The text criteria are rendered into the agent instructions. The rule engine
/// works from the structured knobs (`spam_match`, `trusted_tlds`,
/// `max_vague_words`, `similarity_threshold` and the example sets).
///
/// Every field has a default, so a policy file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationPolicy {
    /// Policy name, reported by the flow listing
    pub name: String,
    /// Opening paragraph of the instructions
    pub goal: String,
    /// Fields the classifier may use as evidence
    pub admissible_fields: Vec<String>,
    /// Combinator for the spam criteria
    pub spam_match: RuleMatch,
    pub spam_criteria: Vec<String>,
    /// Always conjunctive. `{keywords}` expands to `legit_keywords`.
    pub legit_criteria: Vec<String>,
    pub legit_keywords: Vec<String>,
    pub spam_examples: Vec<PolicyExample>,
    pub legit_examples: Vec<PolicyExample>,
    /// Top-level domains accepted as a legitimate email domain
    pub trusted_tlds: Vec<String>,
    /// Descriptions with at most this many words count as vague
    pub max_vague_words: usize,
    /// Token overlap (0.0..=1.0) at which a description resembles an example
    pub similarity_threshold: f64,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            name: "calendar-spam".to_string(),
            goal: "Your goal should be to classify Google Calendar events to identify if they were created by a spammer or not. Be strict in your assessments.".to_string(),
            admissible_fields: vec!["description".to_string(), "invitee_email".to_string()],
            spam_match: RuleMatch::Any,
            spam_criteria: vec![
                "`invitee_email` does not use a legitimate email domain".to_string(),
                "`description` is extremely vague and consists of only one word".to_string(),
                "`description` doesn't provide any context about the purpose of the meeting or event".to_string(),
                "`description` contains non-descriptive content that is similar to some of the spam examples provided".to_string(),
            ],
            legit_criteria: vec![
                "`invitee_email` uses a legitimate business email domain".to_string(),
                "`description` provides context about the purpose of the meeting or event".to_string(),
                "`description` contains references to {keywords}".to_string(),
                "`description` is descriptive and similar to some of the legit examples provided".to_string(),
            ],
            legit_keywords: vec![
                "Data Engineering".to_string(),
                "Data Science".to_string(),
                "Machine Learning".to_string(),
                "Helm".to_string(),
                "Kubernetes".to_string(),
            ],
            spam_examples: vec![
                PolicyExample::new("eli@scenset.comhi", "i'm interested"),
                PolicyExample::new("henry@climatepolicyradar.org", "Are you hiring desparate for job"),
                PolicyExample::new("parash.hallur@kyndryl.com", "asdfiyb12"),
                PolicyExample::new("johnny@boeing.com", "saturday night meet me on the town"),
            ],
            legit_examples: vec![
                PolicyExample::new("kevin@elasti.ai", "Data engineering team capacity is low"),
                PolicyExample::new("tita.ristanto@span.io", "Prefect demo"),
                PolicyExample::new("jef@operto.com", "troubleshoot data pipelines"),
                PolicyExample::new(
                    "kiran.jayasheela@mercedes-benz.com",
                    "Is there a Helm chart to create a Prefect Kubernetes work pool?",
                ),
            ],
            trusted_tlds: [
                "com", "org", "net", "io", "ai", "co", "dev", "app", "edu", "gov", "eu", "uk",
                "de", "fi", "se", "no", "dk", "fr", "nl", "es", "it", "ch", "at", "be", "pl",
                "in", "us", "ca", "au", "nz", "jp", "sg", "br",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_vague_words: 1,
            similarity_threshold: 0.6,
        }
    }
}

impl ClassificationPolicy {
    /// Parse and validate a TOML policy document
    pub fn from_toml(content: &str) -> VahtiResult<Self> {
        let policy: ClassificationPolicy = toml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies that cannot be evaluated
    pub fn validate(&self) -> VahtiResult<()> {
        if self.admissible_fields.is_empty() {
            return Err(config_error("Policy must admit at least one event field"));
        }
        if let Some(unknown) = self
            .admissible_fields
            .iter()
            .find(|f| !KNOWN_FIELDS.contains(&f.as_str()))
        {
            return Err(config_error(&format!("Unknown admissible field '{}'", unknown)));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(config_error("similarity_threshold must be between 0.0 and 1.0"));
        }
        if self.spam_criteria.is_empty() {
            return Err(config_error("Policy must define at least one spam criterion"));
        }
        Ok(())
    }

    /// Check whether a field may be used as evidence
    pub fn admits(&self, field: &str) -> bool {
        self.admissible_fields.iter().any(|f| f == field)
    }

    /// Render the natural-language instructions handed to the agent
    pub fn render_instructions(&self) -> String {
        Instructions(self).to_string()
    }
}

/// Display adapter turning a policy into agent instructions
struct Instructions<'a>(&'a ClassificationPolicy);

impl fmt::Display for Instructions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = self.0;
        let fields = policy
            .admissible_fields
            .iter()
            .map(|field| format!("`{}`", field))
            .collect::<Vec<_>>()
            .join(" and ");
        let keywords = policy.legit_keywords.join(", ");

        writeln!(f, "{}", policy.goal.trim())?;
        writeln!(f)?;
        writeln!(
            f,
            "ONLY consider the {} fields when classifying the event. Disregard all other fields.",
            fields
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Categorize the event as spam if {} of the following hold:",
            policy.spam_match.as_phrase()
        )?;
        for criterion in &policy.spam_criteria {
            writeln!(f, "- {}", criterion.replace("{keywords}", &keywords))?;
        }
        write_examples(f, "SPAM EXAMPLES", &policy.spam_examples)?;

        writeln!(f, "Categorize the event as not spam if ALL of the following hold:")?;
        for criterion in &policy.legit_criteria {
            writeln!(f, "- {}", criterion.replace("{keywords}", &keywords))?;
        }
        write_examples(f, "LEGIT EXAMPLES", &policy.legit_examples)
    }
}

fn write_examples(f: &mut fmt::Formatter<'_>, title: &str, examples: &[PolicyExample]) -> fmt::Result {
    writeln!(f)?;
    if examples.is_empty() {
        return Ok(());
    }
    writeln!(f, "```")?;
    writeln!(f, "{}:", title)?;
    for example in examples {
        writeln!(f, "email: {}, description: {}", example.email, example.description)?;
    }
    writeln!(f, "```")?;
    writeln!(f)
}
