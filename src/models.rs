/// Data models for the clinic scheduling system.
///
/// This module defines the core data structures used throughout the system:
/// - EntityKind: Which collection a record lives in
/// - Doctor: A doctor and their specialization
/// - Patient: Patient information, including the one mutable field (diagnosis)
/// - NewPatient: Caller-supplied patient input, validated by the service
/// - DateFormat: Accepted appointment date layouts
/// - ScheduledAt: When an appointment takes place
/// - Appointment: A booked appointment referencing a doctor and a patient

use crate::error::{SchedulingError, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

pub const DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M";
pub const DATE_PATTERN: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Doctor,
    Patient,
}

impl EntityKind {
    pub fn name(&self) -> &str {
        match self {
            EntityKind::Doctor => "Doctor",
            EntityKind::Patient => "Patient",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check that a required text field has content and return it trimmed.
pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

fn optional_text(field: &'static str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    value.map(|v| required_text(field, v)).transpose()
}

/// Represents a doctor. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialization: String,
}

impl Doctor {
    /// Create a new doctor with validation.
    pub fn new(id: u32, name: &str, specialization: &str) -> Result<Self, ValidationError> {
        Ok(Doctor {
            id,
            name: required_text("Name", name)?,
            specialization: required_text("Specialization", specialization)?,
        })
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Doctor [ID={}, Name={}, Specialization={}]",
            self.id, self.name, self.specialization
        )
    }
}

/// Patient input as collected from a form or prompt.
///
/// Age stays as text so that a malformed number is reported by the
/// service like any other validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub age: Option<String>,
    pub diagnosis: Option<String>,
    pub contact: Option<String>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>) -> Self {
        NewPatient {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn age(mut self, age: impl Into<String>) -> Self {
        self.age = Some(age.into());
        self
    }

    pub fn diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.diagnosis = Some(diagnosis.into());
        self
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// Represents a patient in the scheduling system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: u32,
    pub name: String,
    pub age: Option<u32>,
    pub contact: Option<String>,
    diagnosis: RefCell<Option<String>>,
}

impl Patient {
    /// Create a new patient from caller input with validation.
    pub fn new(id: u32, input: NewPatient) -> Result<Self, ValidationError> {
        let name = required_text("Name", &input.name)?;
        let age = match input.age.as_deref() {
            Some(raw) => Some(raw.trim().parse::<u32>().map_err(|_| {
                ValidationError::MalformedNumber {
                    field: "Age",
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };
        let diagnosis = optional_text("Diagnosis", input.diagnosis.as_deref())?;
        let contact = optional_text("Contact", input.contact.as_deref())?;

        Ok(Patient {
            id,
            name,
            age,
            contact,
            diagnosis: RefCell::new(diagnosis),
        })
    }

    pub fn diagnosis(&self) -> Ref<'_, Option<String>> {
        self.diagnosis.borrow()
    }

    /// Replace the diagnosis. Every appointment sharing this record sees the change.
    pub(crate) fn set_diagnosis(&self, diagnosis: String) {
        *self.diagnosis.borrow_mut() = Some(diagnosis);
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = self
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let diagnosis = self.diagnosis();
        write!(
            f,
            "Patient [ID={}, Name={}, Age={}, Diagnosis={}",
            self.id,
            self.name,
            age,
            diagnosis.as_deref().unwrap_or("N/A")
        )?;
        if let Some(contact) = &self.contact {
            write!(f, ", Contact={}", contact)?;
        }
        f.write_str("]")
    }
}

/// Which date layouts an appointment time may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `yyyy-MM-dd HH:mm` only.
    DateTime,
    /// `YYYY-MM-DD` only.
    Date,
    /// Either of the above, date-time tried first.
    #[default]
    DateOrDateTime,
}

impl DateFormat {
    /// Human-readable form of the accepted layouts, used in error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            DateFormat::DateTime => "yyyy-MM-dd HH:mm",
            DateFormat::Date => "yyyy-MM-dd",
            DateFormat::DateOrDateTime => "yyyy-MM-dd HH:mm' or 'yyyy-MM-dd",
        }
    }

    pub fn parse(&self, text: &str) -> Result<ScheduledAt, SchedulingError> {
        let trimmed = text.trim();
        // chrono accepts unpadded fields and loose spacing, so only keep a
        // parse that formats back to exactly the text given.
        let date_time = || {
            NaiveDateTime::parse_from_str(trimmed, DATE_TIME_PATTERN)
                .ok()
                .filter(|dt| dt.format(DATE_TIME_PATTERN).to_string() == trimmed)
                .map(ScheduledAt::DateTime)
        };
        let date = || {
            NaiveDate::parse_from_str(trimmed, DATE_PATTERN)
                .ok()
                .filter(|d| d.format(DATE_PATTERN).to_string() == trimmed)
                .map(ScheduledAt::Date)
        };

        let parsed = match self {
            DateFormat::DateTime => date_time(),
            DateFormat::Date => date(),
            DateFormat::DateOrDateTime => date_time().or_else(date),
        };

        parsed.ok_or_else(|| SchedulingError::DateFormat {
            input: text.to_string(),
            expected: self.expected(),
        })
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().trim() {
            "datetime" | "date-time" => Ok(DateFormat::DateTime),
            "date" => Ok(DateFormat::Date),
            "any" => Ok(DateFormat::DateOrDateTime),
            _ => Err(format!(
                "Invalid date format: '{}'. Must be one of: datetime, date, any",
                value
            )),
        }
    }
}

/// When an appointment takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScheduledAt {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl fmt::Display for ScheduledAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduledAt::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_PATTERN)),
            ScheduledAt::Date(d) => write!(f, "{}", d.format(DATE_PATTERN)),
        }
    }
}

/// Represents a booked appointment.
///
/// The doctor and patient are the service's own records, shared rather
/// than copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: u32,
    pub doctor: Rc<Doctor>,
    pub patient: Rc<Patient>,
    pub scheduled_at: ScheduledAt,
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment [ID={}, Date={}\n  Patient: {}\n  Doctor: {} ({})]",
            self.id,
            self.scheduled_at,
            self.patient.name,
            self.doctor.name,
            self.doctor.specialization
        )
    }
}
