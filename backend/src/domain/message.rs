//! Messages sent by patients to their doctors.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A note from a patient to a doctor. Append-only; there is no read
/// receipt or threading, a message is delivered once and kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Stable identifier assigned at send time.
    pub id: Uuid,
    /// Sending patient.
    pub patient_id: Uuid,
    /// Addressed doctor.
    pub doctor_id: Uuid,
    /// Free-text body.
    pub content: String,
    /// Send timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Record a new message with a freshly assigned id.
    pub fn send(patient_id: Uuid, doctor_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            content,
            created_at: Utc::now(),
        }
    }
}
