//! Billing ledger records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An invoice raised against a patient for a consultation.
///
/// ## Invariants
/// - `total` equals `fees + medicines_cost` as computed at creation and
///   is never re-derived afterwards (there is no edit path).
/// - `paid` transitions `false → true` at most once; `paid_at` records
///   the first successful payment and is never overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Patient being billed.
    pub patient_id: Uuid,
    /// Doctor the consultation was with.
    pub doctor_id: Uuid,
    /// Consultation fees.
    pub fees: f64,
    /// Cost of prescribed medicines.
    pub medicines_cost: f64,
    /// Derived once at creation.
    pub total: f64,
    /// Whether the bill has been settled.
    pub paid: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the first successful payment.
    pub paid_at: Option<DateTime<Utc>>,
}

impl Bill {
    /// Raise a new unpaid bill, fixing `total` at creation time.
    pub fn raise(patient_id: Uuid, doctor_id: Uuid, fees: f64, medicines_cost: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            fees,
            medicines_cost,
            total: fees + medicines_cost,
            paid: false,
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    /// Settle the bill. Repeated calls are accepted and leave both
    /// `paid` and `paid_at` unchanged; this mirrors the long-observed
    /// behaviour of the system and is documented, not guaranteed.
    pub fn pay(&mut self) {
        if !self.paid {
            self.paid = true;
            self.paid_at = Some(Utc::now());
        }
    }
}
