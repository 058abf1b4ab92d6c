use crate::components::classifier::ClassificationPolicy;
use crate::error::{config_error, env_error, VahtiResult};
use dotenvy::dotenv;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// Default policy document location
pub const DEFAULT_POLICY_FILE: &str = "config/policy.toml";

/// Default Gemini model used for classification
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Which classifier implementation answers the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Delegate to the Gemini agent
    Gemini,
    /// Evaluate the policy with the local rule engine
    Rules,
}

impl FromStr for ClassifierBackend {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ClassifierBackend::Gemini),
            "rules" => Ok(ClassifierBackend::Rules),
            other => Err(config_error(&format!(
                "Unknown CLASSIFIER_BACKEND '{}', expected 'gemini' or 'rules'",
                other
            ))),
        }
    }
}

/// Main configuration structure for the service
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Classifier implementation
    pub classifier_backend: ClassifierBackend,
    /// Gemini API key, required for the Gemini backend
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Upper bound for a single classification call
    pub classifier_timeout_secs: u64,
    /// Webhook endpoint notified about spam, notifier disabled when unset
    pub webhook_url: Option<Url>,
    /// Upper bound for a single webhook request
    pub webhook_timeout_secs: u64,
    /// Spam policy used by every classifier
    pub policy: ClassificationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            classifier_backend: ClassifierBackend::Gemini,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            classifier_timeout_secs: 60,
            webhook_url: None,
            webhook_timeout_secs: 10,
            policy: ClassificationPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and policy file
    pub fn load() -> VahtiResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| String::from("127.0.0.1"));
        let port = parse_env("PORT", 3000u16)?;

        let classifier_backend = env::var("CLASSIFIER_BACKEND")
            .unwrap_or_else(|_| String::from("gemini"))
            .parse::<ClassifierBackend>()?;

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        if classifier_backend == ClassifierBackend::Gemini && gemini_api_key.is_none() {
            return Err(env_error("GEMINI_API_KEY"));
        }
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_GEMINI_MODEL));
        let classifier_timeout_secs = parse_timeout("CLASSIFIER_TIMEOUT_SECS", 60)?;

        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim())
                    .map_err(|e| config_error(&format!("Invalid WEBHOOK_URL: {}", e)))?,
            ),
            _ => None,
        };
        let webhook_timeout_secs = parse_timeout("WEBHOOK_TIMEOUT_SECS", 10)?;

        let policy_file =
            env::var("POLICY_FILE").unwrap_or_else(|_| String::from(DEFAULT_POLICY_FILE));
        let policy = load_policy(Path::new(&policy_file))?;

        Ok(Config {
            host,
            port,
            classifier_backend,
            gemini_api_key,
            gemini_model,
            classifier_timeout_secs,
            webhook_url,
            webhook_timeout_secs,
            policy,
        })
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if the webhook notifier is enabled
    pub fn notifier_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}

/// Load the policy document, falling back to the built-in policy when the file is absent
pub fn load_policy(path: &Path) -> VahtiResult<ClassificationPolicy> {
    if !path.exists() {
        return Ok(ClassificationPolicy::default());
    }
    let content = fs::read_to_string(path)?;
    ClassificationPolicy::from_toml(&content)
        .map_err(|e| config_error(&format!("Invalid policy file {}: {}", path.display(), e)))
}

fn parse_env<T: FromStr>(var: &str, default: T) -> VahtiResult<T> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} format", var))),
        Err(_) => Ok(default),
    }
}

fn parse_timeout(var: &str, default: u64) -> VahtiResult<u64> {
    match parse_env(var, default)? {
        0 => Err(config_error(&format!("{} must be at least 1 second", var))),
        secs => Ok(secs),
    }
}
