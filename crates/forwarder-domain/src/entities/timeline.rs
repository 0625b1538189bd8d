//! Shipment tracking events.

use super::assign_if_nil;
use chrono::{DateTime, Utc};
use forwarder_core::{Audit, Auditable, Entity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A milestone in a shipment's life (booked, departed, customs cleared...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct TimelineEvent {
    pub id: Uuid,

    pub shipment_id: Uuid,

    /// Short machine code, e.g. `DEP`, `ARR`, `CLR`.
    #[validate(length(min = 1, max = 16))]
    pub event_code: String,

    #[validate(length(max = 512))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub location: Option<String>,

    /// When the event happened, as reported by the source.
    pub occurred_at: DateTime<Utc>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl TimelineEvent {
    /// Creates an unsaved event.
    #[must_use]
    pub fn new(shipment_id: Uuid, event_code: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            shipment_id,
            event_code: event_code.into(),
            description: None,
            location: None,
            occurred_at,
            audit: Audit::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for TimelineEvent {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for TimelineEvent {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}
