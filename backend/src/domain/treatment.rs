//! Treatment (prescription) records. Append-only: there is no update or
//! delete path once a doctor records one.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A prescription recorded by a doctor for a patient.
#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Patient being treated.
    pub patient_id: Uuid,
    /// Prescribing doctor.
    pub doctor_id: Uuid,
    /// Free-text prescription.
    pub prescription: String,
    /// Estimated days until cured.
    pub days_to_cure: u32,
    /// Free-text medicines list.
    pub medicines: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Treatment {
    /// Record a new treatment.
    pub fn record(
        patient_id: Uuid,
        doctor_id: Uuid,
        prescription: String,
        days_to_cure: u32,
        medicines: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            prescription,
            days_to_cure,
            medicines,
            created_at: Utc::now(),
        }
    }
}
