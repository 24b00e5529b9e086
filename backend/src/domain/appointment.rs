//! Appointment records and their status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Appointment lifecycle status.
///
/// `pending → approved` is the only forward transition; `removed` is a
/// terminal soft-delete reachable from any state. A pending appointment
/// never expires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Awaiting the doctor's approval.
    Pending,
    /// Confirmed by the appointment's doctor.
    Approved,
    /// Soft-deleted by staff; the record remains queryable.
    Removed,
}

impl AppointmentStatus {
    /// Canonical lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of pending, approved, or removed")]
pub struct InvalidStatus;

impl std::str::FromStr for AppointmentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "removed" => Ok(Self::Removed),
            _ => Err(InvalidStatus),
        }
    }
}

/// Rejected status transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Only the appointment's own doctor may approve it.
    #[error("only the appointment's doctor can approve it")]
    NotOwningDoctor,
    /// Approval is only legal from `pending`.
    #[error("appointment is {status} and cannot be approved")]
    NotPending {
        /// Status the appointment was in when approval was attempted.
        status: AppointmentStatus,
    },
}

/// A booked appointment between one patient and one doctor.
///
/// Holds weak references (ids) to the users involved; referential
/// integrity is checked at creation time by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Patient the appointment is for.
    pub patient_id: Uuid,
    /// Doctor expected to take the appointment.
    pub doctor_id: Uuid,
    /// Requested consultation time.
    pub scheduled_time: DateTime<Utc>,
    /// Lifecycle status; starts `pending`.
    pub status: AppointmentStatus,
    /// Needs-attention indicator shown to staff until cleared.
    pub notified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Book a new appointment in state `pending` with the notification
    /// indicator raised.
    pub fn book(patient_id: Uuid, doctor_id: Uuid, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            scheduled_time,
            status: AppointmentStatus::Pending,
            notified: true,
            created_at: Utc::now(),
        }
    }

    /// Approve a pending appointment.
    ///
    /// The ownership check runs before the status check so a non-owning
    /// doctor is always told "forbidden", never which state the
    /// appointment is in, and the state is left untouched either way.
    pub fn approve(&mut self, acting_doctor: Uuid) -> Result<(), TransitionError> {
        if acting_doctor != self.doctor_id {
            return Err(TransitionError::NotOwningDoctor);
        }
        match self.status {
            AppointmentStatus::Pending => {
                self.status = AppointmentStatus::Approved;
                Ok(())
            }
            status => Err(TransitionError::NotPending { status }),
        }
    }

    /// Soft-delete the appointment. Legal from any state; repeated calls
    /// are no-ops and there is no way back out of `removed`.
    pub fn remove(&mut self) {
        self.status = AppointmentStatus::Removed;
    }

    /// Clear the needs-attention indicator. Independent of status.
    pub fn clear_notification(&mut self) {
        self.notified = false;
    }
}
