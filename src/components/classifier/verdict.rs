use crate::components::event::CalendarEvent;
use crate::error::{classification_error, VahtiResult};
use serde::Deserialize;
use tracing::error;

/// Task sentence handed to the agent together with the event context
pub const TASK_PROMPT: &str =
    "Classify the following calendar event to determine if it is submitted by a spammer.";

/// Reply shape the agent is asked for
#[derive(Debug, Deserialize)]
struct Verdict {
    is_spam: bool,
}

/// Build the user prompt for one event
pub fn build_task_prompt(event: &CalendarEvent) -> VahtiResult<String> {
    let context = serde_json::to_string_pretty(event)?;
    Ok(format!(
        "{TASK_PROMPT}\n\n\
         Event:\n{context}\n\n\
         Respond ONLY with a JSON object of the form {{\"is_spam\": true}} or {{\"is_spam\": false}}. \
         Do not include any other text."
    ))
}

/// Attempt to read a boolean verdict from the model response
pub fn parse_verdict(response: &str) -> VahtiResult<bool> {
    // Try to extract a JSON object from the text
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            match serde_json::from_str::<Verdict>(&response[start..=end]) {
                Ok(verdict) => return Ok(verdict.is_spam),
                Err(e) => error!("Failed to parse verdict JSON from response: {}", e),
            }
        }
    }

    // Bare boolean answers
    let cleaned = response
        .trim()
        .trim_matches(|c: char| c == '`' || c == '"' || c == '.' || c.is_whitespace())
        .to_ascii_lowercase();
    match cleaned.as_str() {
        "true" | "yes" | "spam" => Ok(true),
        "false" | "no" | "not spam" => Ok(false),
        _ => {
            error!("Could not extract a verdict from response: {}", response);
            Err(classification_error(
                "Could not extract a boolean verdict from the model response",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict_json() {
        assert!(parse_verdict(r#"{"is_spam": true}"#).unwrap());
        assert!(!parse_verdict(r#"{"is_spam": false}"#).unwrap());
    }

    #[test]
    fn test_parse_verdict_json_wrapped_in_prose() {
        let response = "Sure!\n```json\n{\"is_spam\": true}\n```";
        assert!(parse_verdict(response).unwrap());
    }

    #[test]
    fn test_parse_verdict_bare_boolean() {
        assert!(parse_verdict(" True.\n").unwrap());
        assert!(!parse_verdict("`false`").unwrap());
    }

    #[test]
    fn test_parse_verdict_rejects_unclear_answer() {
        assert!(parse_verdict("It depends on the context").is_err());
        assert!(parse_verdict(r#"{"spam": "maybe"}"#).is_err());
    }

    #[test]
    fn test_task_prompt_carries_event_context() {
        let event = CalendarEvent::new("Prefect demo", "", "", "tita.ristanto@span.io", "e9");
        let prompt = build_task_prompt(&event).unwrap();
        assert!(prompt.starts_with(TASK_PROMPT));
        assert!(prompt.contains("\"invitee_email\": \"tita.ristanto@span.io\""));
        assert!(prompt.contains("\"event_id\": \"e9\""));
    }
}
