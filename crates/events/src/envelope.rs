use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storehub_core::AggregateId;

/// Envelope for a published event: routing metadata around an opaque payload.
///
/// `subject_type`/`subject_id` identify the record the event is about
/// ("order" / order id, "product" / product id), letting consumers filter
/// without decoding the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    subject_id: AggregateId,
    subject_type: String,
    event_type: String,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        subject_id: AggregateId,
        subject_type: impl Into<String>,
        event_type: impl Into<String>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            subject_id,
            subject_type: subject_type.into(),
            event_type: event_type.into(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn subject_id(&self) -> AggregateId {
        self.subject_id
    }

    pub fn subject_type(&self) -> &str {
        &self.subject_type
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
