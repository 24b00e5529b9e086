//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without real I/O.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{
    AppointmentRepository, BillRepository, MessageRepository, TreatmentRepository, UserRepository,
};
use crate::outbound::{
    InMemoryAppointmentLedger, InMemoryBillLedger, InMemoryMessageLedger, InMemoryTreatmentLedger,
    InMemoryUserLedger,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub treatments: Arc<dyn TreatmentRepository>,
    pub bills: Arc<dyn BillRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub tokens: Arc<TokenService>,
}

impl HttpState {
    /// Wire up fresh in-memory ledgers with a token service using `secret`.
    pub fn in_memory(secret: &str) -> Self {
        Self {
            users: Arc::new(InMemoryUserLedger::new()),
            appointments: Arc::new(InMemoryAppointmentLedger::new()),
            treatments: Arc::new(InMemoryTreatmentLedger::new()),
            bills: Arc::new(InMemoryBillLedger::new()),
            messages: Arc::new(InMemoryMessageLedger::new()),
            tokens: Arc::new(TokenService::new(secret)),
        }
    }
}
