//! Domain primitives and aggregates.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types transport-agnostic and document
//! invariants in each type's Rustdoc.

pub mod appointment;
pub mod auth;
pub mod billing;
pub mod error;
pub mod message;
pub mod ports;
pub mod token;
pub mod treatment;
pub mod user;

pub use self::appointment::{Appointment, AppointmentStatus, TransitionError};
pub use self::auth::{LoginCredentials, LoginValidationError, PasswordHash};
pub use self::billing::Bill;
pub use self::error::{Error, ErrorCode};
pub use self::message::Message;
pub use self::token::{Claims, TokenService};
pub use self::treatment::Treatment;
pub use self::user::{EmailAddress, Profile, Role, User};
