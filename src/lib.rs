//! In-memory clinic scheduling: doctors, patients and appointments.
//!
//! [`SchedulingService`] is the only component with state. Callers such as
//! the [`ConsoleApp`] menu borrow one service instance created at start-up.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use console::ConsoleApp;
pub use error::{SchedulingError, ValidationError};
pub use models::{Appointment, DateFormat, Doctor, EntityKind, NewPatient, Patient, ScheduledAt};
pub use service::SchedulingService;
