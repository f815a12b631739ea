//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A scheduled event shown on the events page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: DateTime<Utc>,
    pub ticket_url: Option<String>,
    pub image_url: Option<String>,
    pub is_upcoming: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub event_date: DateTime<Utc>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub ticket_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub image_url: Option<String>,

    /// Defaults to true.
    pub is_upcoming: Option<bool>,

    #[serde(default)]
    pub is_featured: bool,
}

impl CreateEventRequest {
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            description: self.description,
            location: self.location,
            event_date: self.event_date,
            ticket_url: self.ticket_url,
            image_url: self.image_url,
            is_upcoming: self.is_upcoming.unwrap_or(true),
            is_featured: self.is_featured,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub event_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub ticket_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub image_url: Option<String>,

    pub is_upcoming: Option<bool>,

    pub is_featured: Option<bool>,
}

impl UpdateEventRequest {
    pub fn apply_to(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(location) = self.location {
            event.location = Some(location);
        }
        if let Some(date) = self.event_date {
            event.event_date = date;
        }
        if let Some(url) = self.ticket_url {
            event.ticket_url = Some(url);
        }
        if let Some(url) = self.image_url {
            event.image_url = Some(url);
        }
        if let Some(upcoming) = self.is_upcoming {
            event.is_upcoming = upcoming;
        }
        if let Some(featured) = self.is_featured {
            event.is_featured = featured;
        }
        event.updated_at = now;
    }
}

/// Filter for listing events.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EventFilter {
    pub upcoming: Option<bool>,
    pub featured: Option<bool>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.upcoming.map_or(true, |u| event.is_upcoming == u)
            && self.featured.map_or(true, |f| event.is_featured == f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "Open Studio".into(),
            description: None,
            location: Some("Main St".into()),
            event_date: now,
            ticket_url: None,
            image_url: None,
            is_upcoming: true,
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_request_deserialization_defaults() {
        let json = r#"{"title": "Pop-up", "event_date": "2026-11-01T18:00:00Z"}"#;
        let request: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert!(request.is_upcoming.is_none());
        assert!(!request.is_featured);
        assert!(request.validate().is_ok());

        let event = request.into_event(Utc::now());
        assert!(event.is_upcoming);
        assert_eq!(event.title, "Pop-up");
    }

    #[test]
    fn test_create_request_rejects_bad_ticket_url() {
        let json = r#"{"title": "Pop-up", "event_date": "2026-11-01T18:00:00Z", "ticket_url": "ftp://x"}"#;
        let request: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_flags() {
        let mut event = sample_event();
        UpdateEventRequest {
            is_upcoming: Some(false),
            is_featured: Some(true),
            ..Default::default()
        }
        .apply_to(&mut event, Utc::now());
        assert!(!event.is_upcoming);
        assert!(event.is_featured);
        assert_eq!(event.title, "Open Studio");
    }

    #[test]
    fn test_filter() {
        let event = sample_event();
        assert!(EventFilter::default().matches(&event));
        assert!(EventFilter {
            upcoming: Some(true),
            featured: None
        }
        .matches(&event));
        assert!(!EventFilter {
            upcoming: None,
            featured: Some(true)
        }
        .matches(&event));
    }
}
