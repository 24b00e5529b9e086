//! In-memory ledger adapters.
//!
//! Each entity type gets its own `Mutex`-guarded vector; the lock is
//! held only for the duration of one read-modify-write, which restores
//! the sequential behaviour the original single-threaded system assumed.
//! Records keep their insertion order so listings reflect registration
//! and creation order.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::billing::Bill;
use crate::domain::message::Message;
use crate::domain::ports::{
    AppointmentRepository, BillRepository, LedgerError, MessageRepository, TreatmentRepository,
    UserRepository,
};
use crate::domain::treatment::Treatment;
use crate::domain::user::{Role, User};

fn lock<T>(ledger: &Mutex<Vec<T>>) -> Result<MutexGuard<'_, Vec<T>>, LedgerError> {
    ledger.lock().map_err(|_| LedgerError::Poisoned)
}

/// Identity store backed by a process-local vector.
#[derive(Default)]
pub struct InMemoryUserLedger {
    inner: Mutex<Vec<User>>,
}

impl InMemoryUserLedger {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserLedger {
    async fn insert(&self, user: User) -> Result<User, LedgerError> {
        let mut users = lock(&self.inner)?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(LedgerError::DuplicateEmail {
                email: user.email.to_string(),
            });
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        let users = lock(&self.inner)?;
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, LedgerError> {
        let users = lock(&self.inner)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, LedgerError> {
        let users = lock(&self.inner)?;
        Ok(users.iter().filter(|u| u.role == role).cloned().collect())
    }
}

/// Appointment ledger backed by a process-local vector.
#[derive(Default)]
pub struct InMemoryAppointmentLedger {
    inner: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<F>(&self, id: Uuid, op: F) -> Result<Appointment, LedgerError>
    where
        F: FnOnce(&mut Appointment) -> Result<(), LedgerError>,
    {
        let mut appointments = lock(&self.inner)?;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LedgerError::NotFound { id })?;
        op(appointment)?;
        Ok(appointment.clone())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentLedger {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, LedgerError> {
        let mut appointments = lock(&self.inner)?;
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, LedgerError> {
        let appointments = lock(&self.inner)?;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, LedgerError> {
        let appointments = lock(&self.inner)?;
        Ok(appointments
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }

    async fn approve(&self, id: Uuid, acting_doctor: Uuid) -> Result<Appointment, LedgerError> {
        self.mutate(id, |appointment| {
            appointment.approve(acting_doctor).map_err(LedgerError::from)
        })
    }

    async fn remove(&self, id: Uuid) -> Result<Appointment, LedgerError> {
        self.mutate(id, |appointment| {
            appointment.remove();
            Ok(())
        })
    }

    async fn clear_notification(&self, id: Uuid) -> Result<Appointment, LedgerError> {
        self.mutate(id, |appointment| {
            appointment.clear_notification();
            Ok(())
        })
    }
}

/// Message ledger backed by a process-local vector.
#[derive(Default)]
pub struct InMemoryMessageLedger {
    inner: Mutex<Vec<Message>>,
}

impl InMemoryMessageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageLedger {
    async fn insert(&self, message: Message) -> Result<Message, LedgerError> {
        let mut messages = lock(&self.inner)?;
        messages.push(message.clone());
        Ok(message)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Message>, LedgerError> {
        let messages = lock(&self.inner)?;
        Ok(messages
            .iter()
            .filter(|m| m.doctor_id == doctor_id)
            .cloned()
            .collect())
    }
}

/// Treatment ledger backed by a process-local vector.
#[derive(Default)]
pub struct InMemoryTreatmentLedger {
    inner: Mutex<Vec<Treatment>>,
}

impl InMemoryTreatmentLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TreatmentRepository for InMemoryTreatmentLedger {
    async fn insert(&self, treatment: Treatment) -> Result<Treatment, LedgerError> {
        let mut treatments = lock(&self.inner)?;
        treatments.push(treatment.clone());
        Ok(treatment)
    }

    async fn list(&self) -> Result<Vec<Treatment>, LedgerError> {
        let treatments = lock(&self.inner)?;
        Ok(treatments.clone())
    }
}

/// Billing ledger backed by a process-local vector.
#[derive(Default)]
pub struct InMemoryBillLedger {
    inner: Mutex<Vec<Bill>>,
}

impl InMemoryBillLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillRepository for InMemoryBillLedger {
    async fn insert(&self, bill: Bill) -> Result<Bill, LedgerError> {
        let mut bills = lock(&self.inner)?;
        bills.push(bill.clone());
        Ok(bill)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Bill>, LedgerError> {
        let bills = lock(&self.inner)?;
        Ok(bills.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Bill>, LedgerError> {
        let bills = lock(&self.inner)?;
        Ok(bills.clone())
    }

    async fn pay(&self, id: Uuid) -> Result<Bill, LedgerError> {
        let mut bills = lock(&self.inner)?;
        let bill = bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LedgerError::NotFound { id })?;
        bill.pay();
        Ok(bill.clone())
    }
}
