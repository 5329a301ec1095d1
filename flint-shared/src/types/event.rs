use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `flint.{domain}.{entity}.{action}`
/// Example: `flint.discovery.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Discovery engine events, consumed by the notification service
    pub const DISCOVERY_SUPER_LIKED: &str = "flint.discovery.swipe.super_liked";
    pub const DISCOVERY_MATCH_CREATED: &str = "flint.discovery.match.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Notification kind SUPER_LIKE: delivered to the swiped-on user.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SuperLiked {
        pub from_user_id: Uuid,
        pub to_user_id: Uuid,
    }

    /// Notification kind NEW_MATCH: one event per party.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_id: Uuid,
        pub matched_user_id: Uuid,
    }
}
