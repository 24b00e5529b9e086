//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven
//! adapters (today a set of in-memory ledgers). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning a catch-all.

use async_trait::async_trait;
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::appointment::{Appointment, AppointmentStatus, TransitionError};
use super::billing::Bill;
use super::error::Error;
use super::message::Message;
use super::treatment::Treatment;
use super::user::{Role, User};

/// Errors surfaced by ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LedgerError {
    /// No record with the given id.
    #[error("record {id} not found")]
    NotFound {
        /// Identifier that failed to resolve.
        id: Uuid,
    },
    /// Email uniqueness violated at registration.
    #[error("email {email} is already registered")]
    DuplicateEmail {
        /// The address that collided (exact, case-sensitive match).
        email: String,
    },
    /// A status transition the state machine rejects.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// A ledger lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    Poisoned,
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { .. } => Self::not_found(err.to_string()),
            LedgerError::DuplicateEmail { .. } => Self::conflict(err.to_string()),
            LedgerError::Transition(TransitionError::NotOwningDoctor) => {
                Self::forbidden(err.to_string())
            }
            LedgerError::Transition(TransitionError::NotPending { .. }) => {
                Self::invalid_request(err.to_string())
            }
            LedgerError::Poisoned => Self::internal(err.to_string()),
        }
    }
}

/// Identity store: registered users keyed by id, unique by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, rejecting duplicate emails.
    async fn insert(&self, user: User) -> Result<User, LedgerError>;
    /// Look up a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, LedgerError>;
    /// Look up a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, LedgerError>;
    /// All users of a role, in registration order.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, LedgerError>;
}

/// Appointment ledger.
///
/// Mutations run under the ledger's lock so each read-modify-write is a
/// single atomic step; the state-machine rules themselves live on
/// [`Appointment`].
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Append a new appointment.
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, LedgerError>;
    /// Fetch one appointment by id.
    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, LedgerError>;
    /// All appointments in creation order, optionally filtered by status.
    async fn list(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, LedgerError>;
    /// Approve a pending appointment on behalf of `acting_doctor`.
    async fn approve(&self, id: Uuid, acting_doctor: Uuid) -> Result<Appointment, LedgerError>;
    /// Soft-delete an appointment.
    async fn remove(&self, id: Uuid) -> Result<Appointment, LedgerError>;
    /// Clear the needs-attention indicator.
    async fn clear_notification(&self, id: Uuid) -> Result<Appointment, LedgerError>;
}

/// Message ledger: append only, read per addressed doctor.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a new message.
    async fn insert(&self, message: Message) -> Result<Message, LedgerError>;
    /// All messages addressed to `doctor_id`, in send order.
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Message>, LedgerError>;
}

/// Treatment ledger: append and read only.
#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    /// Append a new treatment.
    async fn insert(&self, treatment: Treatment) -> Result<Treatment, LedgerError>;
    /// All treatments in creation order.
    async fn list(&self) -> Result<Vec<Treatment>, LedgerError>;
}

/// Billing ledger.
#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Append a new bill.
    async fn insert(&self, bill: Bill) -> Result<Bill, LedgerError>;
    /// Fetch one bill by id.
    async fn get(&self, id: Uuid) -> Result<Option<Bill>, LedgerError>;
    /// All bills in creation order.
    async fn list(&self) -> Result<Vec<Bill>, LedgerError>;
    /// Settle a bill; unknown ids leave the ledger untouched.
    async fn pay(&self, id: Uuid) -> Result<Bill, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(LedgerError::NotFound { id: Uuid::nil() }, ErrorCode::NotFound)]
    #[case(
        LedgerError::DuplicateEmail { email: "a@x.com".to_owned() },
        ErrorCode::Conflict
    )]
    #[case(
        LedgerError::Transition(TransitionError::NotOwningDoctor),
        ErrorCode::Forbidden
    )]
    #[case(
        LedgerError::Transition(TransitionError::NotPending {
            status: AppointmentStatus::Removed,
        }),
        ErrorCode::InvalidRequest
    )]
    #[case(LedgerError::Poisoned, ErrorCode::InternalError)]
    fn ledger_errors_map_to_stable_codes(#[case] err: LedgerError, #[case] expected: ErrorCode) {
        let domain: Error = err.into();
        assert_eq!(domain.code(), expected);
    }
}
