use serde::{Deserialize, Serialize};

/// Calendar event submitted for classification.
///
/// Fields are private so a parsed event cannot be changed after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    description: String,
    created_date: String,
    event_name: String,
    invitee_email: String,
    event_id: String,
}

impl CalendarEvent {
    /// Create an event from its five fields
    pub fn new(
        description: impl Into<String>,
        created_date: impl Into<String>,
        event_name: impl Into<String>,
        invitee_email: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            created_date: created_date.into(),
            event_name: event_name.into(),
            invitee_email: invitee_email.into(),
            event_id: event_id.into(),
        }
    }

    /// Free text written by the invitee
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_date(&self) -> &str {
        &self.created_date
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Email address of the person who booked the event
    pub fn invitee_email(&self) -> &str {
        &self.invitee_email
    }

    /// Opaque identifier, only used to address the webhook
    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}
