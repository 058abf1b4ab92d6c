pub mod models;

pub use models::CalendarEvent;

use crate::error::{malformed_input, VahtiResult};

/// Parse a serialized calendar event.
///
/// The payload must be a JSON object carrying the five string fields of
/// [`CalendarEvent`]. Values are taken as-is; extra fields are ignored.
pub fn parse_event(event_json: &str) -> VahtiResult<CalendarEvent> {
    serde_json::from_str::<CalendarEvent>(event_json)
        .map_err(|e| malformed_input(&format!("Invalid calendar event JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_event_keeps_values() {
        let json = r#"{
            "description": "Prefect demo",
            "created_date": "2024-05-01T10:00:00Z",
            "event_name": "Intro call",
            "invitee_email": "tita.ristanto@span.io",
            "event_id": "evt-42"
        }"#;

        let event = parse_event(json).unwrap();
        assert_eq!(event.description(), "Prefect demo");
        assert_eq!(event.created_date(), "2024-05-01T10:00:00Z");
        assert_eq!(event.event_name(), "Intro call");
        assert_eq!(event.invitee_email(), "tita.ristanto@span.io");
        assert_eq!(event.event_id(), "evt-42");
    }

    #[test]
    fn test_parse_event_preserves_whitespace_and_empty_strings() {
        let json = r#"{"description":"  spaced  ","created_date":"","event_name":"","invitee_email":"a@b.io","event_id":"e"}"#;

        let event = parse_event(json).unwrap();
        assert_eq!(event.description(), "  spaced  ");
        assert_eq!(event.created_date(), "");
        assert_eq!(event.event_name(), "");
    }

    #[test]
    fn test_parse_event_ignores_extra_fields() {
        let json = r#"{"description":"d","created_date":"c","event_name":"n","invitee_email":"i","event_id":"e","source":"calendly"}"#;
        assert_eq!(parse_event(json).unwrap().event_id(), "e");
    }

    #[test]
    fn test_parse_event_rejects_invalid_json() {
        let result = parse_event("{not json");
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_parse_event_rejects_missing_field() {
        let json = r#"{"description":"d","created_date":"c","event_name":"n","invitee_email":"i"}"#;
        assert!(matches!(parse_event(json), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_parse_event_rejects_non_string_field() {
        let json = r#"{"description":"d","created_date":"c","event_name":"n","invitee_email":"i","event_id":7}"#;
        assert!(matches!(parse_event(json), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_parse_event_rejects_non_object() {
        assert!(matches!(parse_event("[]"), Err(Error::MalformedInput(_))));
        assert!(matches!(parse_event(""), Err(Error::MalformedInput(_))));
    }
}
