/// The scheduling service: sole owner of doctors, patients and appointments.
///
/// Identities are assigned from per-instance counters starting at 1.
/// Collections only grow, and every operation either applies in full or
/// leaves the service untouched.

use crate::error::SchedulingError;
use crate::models::{
    required_text, Appointment, DateFormat, Doctor, EntityKind, NewPatient, Patient,
};
use std::rc::Rc;
use tracing::debug;

/// Monotonic identity source for one collection.
#[derive(Debug, Clone)]
struct IdSequence {
    next: u32,
}

impl IdSequence {
    fn new() -> Self {
        IdSequence { next: 1 }
    }

    fn peek(&self) -> u32 {
        self.next
    }

    /// Consume the identity returned by the last `peek`.
    fn advance(&mut self) {
        self.next += 1;
    }
}

/// In-memory clinic scheduling service.
///
/// Construct one instance at start-up and hand a reference to every
/// caller that needs it.
#[derive(Debug)]
pub struct SchedulingService {
    date_format: DateFormat,
    doctors: Vec<Rc<Doctor>>,
    patients: Vec<Rc<Patient>>,
    appointments: Vec<Rc<Appointment>>,
    doctor_ids: IdSequence,
    patient_ids: IdSequence,
    appointment_ids: IdSequence,
}

impl Default for SchedulingService {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingService {
    /// Initialize an empty service accepting either date layout.
    pub fn new() -> Self {
        Self::with_date_format(DateFormat::default())
    }

    pub fn with_date_format(date_format: DateFormat) -> Self {
        SchedulingService {
            date_format,
            doctors: Vec::new(),
            patients: Vec::new(),
            appointments: Vec::new(),
            doctor_ids: IdSequence::new(),
            patient_ids: IdSequence::new(),
            appointment_ids: IdSequence::new(),
        }
    }

    pub fn date_format(&self) -> DateFormat {
        self.date_format
    }

    /// Add the two demo doctors and two demo patients.
    pub fn seed_demo_data(&mut self) -> Result<(), SchedulingError> {
        self.add_doctor("Dr. Smith", "Cardiology")?;
        self.add_doctor("Dr. Jones", "Neurology")?;
        self.add_patient(NewPatient::new("Alice").age("30").diagnosis("Heart Palpitations"))?;
        self.add_patient(NewPatient::new("Bob").age("45").diagnosis("Migraines"))?;
        Ok(())
    }

    /// Add a doctor and return the stored record.
    pub fn add_doctor(
        &mut self,
        name: &str,
        specialization: &str,
    ) -> Result<Rc<Doctor>, SchedulingError> {
        let doctor = Rc::new(Doctor::new(self.doctor_ids.peek(), name, specialization)?);
        self.doctor_ids.advance();
        self.doctors.push(Rc::clone(&doctor));

        debug!(id = doctor.id, name = %doctor.name, "doctor added");
        Ok(doctor)
    }

    /// Add a patient and return the stored record.
    pub fn add_patient(&mut self, input: NewPatient) -> Result<Rc<Patient>, SchedulingError> {
        let patient = Rc::new(Patient::new(self.patient_ids.peek(), input)?);
        self.patient_ids.advance();
        self.patients.push(Rc::clone(&patient));

        debug!(id = patient.id, name = %patient.name, "patient added");
        Ok(patient)
    }

    pub fn find_doctor_by_id(&self, id: u32) -> Option<Rc<Doctor>> {
        self.doctors.iter().find(|d| d.id == id).cloned()
    }

    pub fn find_patient_by_id(&self, id: u32) -> Option<Rc<Patient>> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }

    pub fn find_appointment_by_id(&self, id: u32) -> Option<Rc<Appointment>> {
        self.appointments.iter().find(|a| a.id == id).cloned()
    }

    /// Book an appointment between an existing patient and doctor.
    ///
    /// Both references are resolved before the date text is looked at.
    /// No conflict detection is performed: the same doctor may be booked
    /// twice at the same time, and past dates are accepted.
    pub fn schedule_appointment(
        &mut self,
        patient_id: u32,
        doctor_id: u32,
        when: &str,
    ) -> Result<Rc<Appointment>, SchedulingError> {
        let patient = self
            .find_patient_by_id(patient_id)
            .ok_or_else(|| SchedulingError::not_found(EntityKind::Patient, patient_id))?;
        let doctor = self
            .find_doctor_by_id(doctor_id)
            .ok_or_else(|| SchedulingError::not_found(EntityKind::Doctor, doctor_id))?;
        let scheduled_at = self.date_format.parse(when)?;

        let appointment = Rc::new(Appointment {
            id: self.appointment_ids.peek(),
            doctor,
            patient,
            scheduled_at,
        });
        self.appointment_ids.advance();
        self.appointments.push(Rc::clone(&appointment));

        debug!(
            id = appointment.id,
            patient_id,
            doctor_id,
            at = %appointment.scheduled_at,
            "appointment scheduled"
        );
        Ok(appointment)
    }

    /// Replace a patient's diagnosis.
    pub fn update_patient_diagnosis(
        &mut self,
        patient_id: u32,
        diagnosis: &str,
    ) -> Result<Rc<Patient>, SchedulingError> {
        let patient = self
            .find_patient_by_id(patient_id)
            .ok_or_else(|| SchedulingError::not_found(EntityKind::Patient, patient_id))?;
        let diagnosis = required_text("Diagnosis", diagnosis)?;
        patient.set_diagnosis(diagnosis);

        debug!(id = patient_id, "patient diagnosis updated");
        Ok(patient)
    }

    /// Snapshot of all doctors in insertion order.
    pub fn list_doctors(&self) -> Vec<Rc<Doctor>> {
        self.doctors.clone()
    }

    /// Snapshot of all patients in insertion order.
    pub fn list_patients(&self) -> Vec<Rc<Patient>> {
        self.patients.clone()
    }

    /// Snapshot of all appointments in insertion order.
    pub fn list_appointments(&self) -> Vec<Rc<Appointment>> {
        self.appointments.clone()
    }

    pub fn doctor_count(&self) -> usize {
        self.doctors.len()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use assert_matches::assert_matches;

    fn seeded() -> SchedulingService {
        let mut service = SchedulingService::new();
        service.seed_demo_data().unwrap();
        service
    }

    #[test]
    fn doctor_ids_start_at_one_without_gaps() {
        let mut service = SchedulingService::new();
        let ids: Vec<u32> = (0..5)
            .map(|i| service.add_doctor(&format!("Dr. {}", i), "General").unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejected_doctor_does_not_consume_an_id() {
        let mut service = SchedulingService::new();
        assert_matches!(
            service.add_doctor("", "Cardiology"),
            Err(SchedulingError::Validation(ValidationError::EmptyField { field: "Name" }))
        );
        assert_eq!(service.doctor_count(), 0);
        assert_eq!(service.add_doctor("Dr. Smith", "Cardiology").unwrap().id, 1);
    }

    #[test]
    fn duplicate_doctor_names_are_allowed() {
        let mut service = SchedulingService::new();
        service.add_doctor("Dr. Smith", "Cardiology").unwrap();
        let second = service.add_doctor("Dr. Smith", "Cardiology").unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(service.doctor_count(), 2);
    }

    #[test]
    fn malformed_age_leaves_patients_unchanged() {
        let mut service = seeded();
        let result = service.add_patient(NewPatient::new("Bob").age("notanumber").diagnosis("x"));
        assert_matches!(
            result,
            Err(SchedulingError::Validation(ValidationError::MalformedNumber { .. }))
        );
        assert_eq!(service.patient_count(), 2);
        assert_eq!(service.add_patient(NewPatient::new("Carol")).unwrap().id, 3);
    }

    #[test]
    fn seeding_uses_ordinary_identities() {
        let mut service = seeded();
        let doctors: Vec<u32> = service.list_doctors().iter().map(|d| d.id).collect();
        let patients: Vec<u32> = service.list_patients().iter().map(|p| p.id).collect();
        assert_eq!(doctors, vec![1, 2]);
        assert_eq!(patients, vec![1, 2]);
        assert_eq!(service.appointment_count(), 0);
        assert_eq!(service.add_doctor("Dr. Who", "Time").unwrap().id, 3);
    }

    #[test]
    fn find_returns_none_for_unknown_ids() {
        let service = seeded();
        assert!(service.find_doctor_by_id(99).is_none());
        assert!(service.find_patient_by_id(0).is_none());
        assert!(service.find_appointment_by_id(1).is_none());
        assert_eq!(service.find_doctor_by_id(2).unwrap().name, "Dr. Jones");
    }

    #[test]
    fn appointment_shares_the_stored_records() {
        let mut service = seeded();
        let appointment = service.schedule_appointment(1, 2, "2025-01-01 10:00").unwrap();

        let doctor = service.find_doctor_by_id(2).unwrap();
        let patient = service.find_patient_by_id(1).unwrap();
        assert!(Rc::ptr_eq(&appointment.doctor, &doctor));
        assert!(Rc::ptr_eq(&appointment.patient, &patient));
        assert!(Rc::ptr_eq(
            &appointment,
            &service.find_appointment_by_id(1).unwrap()
        ));
    }

    #[test]
    fn missing_patient_is_reported_first() {
        let mut service = seeded();
        assert_matches!(
            service.schedule_appointment(7, 99, "garbage"),
            Err(SchedulingError::ReferenceNotFound {
                kind: EntityKind::Patient,
                id: 7
            })
        );
        assert_eq!(service.appointment_count(), 0);
    }

    #[test]
    fn missing_doctor_wins_over_bad_date() {
        let mut service = seeded();
        assert_matches!(
            service.schedule_appointment(1, 99, "not a date"),
            Err(SchedulingError::ReferenceNotFound {
                kind: EntityKind::Doctor,
                id: 99
            })
        );
        assert_eq!(service.appointment_count(), 0);
    }

    #[test]
    fn bad_date_appends_nothing_and_keeps_counter() {
        let mut service = seeded();
        assert_matches!(
            service.schedule_appointment(1, 1, "01/01/2025"),
            Err(SchedulingError::DateFormat { .. })
        );
        assert_eq!(service.appointment_count(), 0);
        assert_eq!(service.schedule_appointment(1, 1, "2025-01-01").unwrap().id, 1);
    }

    #[test]
    fn strict_date_time_policy_rejects_plain_dates() {
        let mut service = SchedulingService::with_date_format(DateFormat::DateTime);
        service.seed_demo_data().unwrap();
        assert_matches!(
            service.schedule_appointment(1, 1, "2025-01-01"),
            Err(SchedulingError::DateFormat { expected: "yyyy-MM-dd HH:mm", .. })
        );
    }

    #[test]
    fn double_booking_and_past_dates_are_accepted() {
        let mut service = seeded();
        let first = service.schedule_appointment(1, 1, "2025-01-01 10:00").unwrap();
        let second = service.schedule_appointment(2, 1, "2025-01-01 10:00").unwrap();
        let past = service.schedule_appointment(1, 1, "1999-12-31 23:59").unwrap();
        assert_eq!((first.id, second.id, past.id), (1, 2, 3));
        assert_eq!(first.scheduled_at, second.scheduled_at);
    }

    #[test]
    fn listings_are_snapshots() {
        let mut service = SchedulingService::new();
        for name in ["Dr. A", "Dr. B", "Dr. C"] {
            service.add_doctor(name, "General").unwrap();
        }

        let mut listed = service.list_doctors();
        let names: Vec<&str> = listed.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. A", "Dr. B", "Dr. C"]);

        listed.clear();
        assert_eq!(service.list_doctors().len(), 3);

        let before = service.list_doctors();
        service.add_doctor("Dr. D", "General").unwrap();
        assert_eq!(before.len(), 3);
    }

    #[test]
    fn diagnosis_update_is_seen_through_appointments() {
        let mut service = seeded();
        let appointment = service.schedule_appointment(2, 2, "2025-02-02").unwrap();

        service.update_patient_diagnosis(2, "Cluster headaches").unwrap();
        assert_eq!(
            appointment.patient.diagnosis().as_deref(),
            Some("Cluster headaches")
        );
    }

    #[test]
    fn diagnosis_update_validates_input() {
        let mut service = seeded();
        assert_matches!(
            service.update_patient_diagnosis(42, "Flu"),
            Err(SchedulingError::ReferenceNotFound {
                kind: EntityKind::Patient,
                id: 42
            })
        );
        assert_matches!(
            service.update_patient_diagnosis(1, " "),
            Err(SchedulingError::Validation(ValidationError::EmptyField { .. }))
        );
        assert_eq!(
            service.find_patient_by_id(1).unwrap().diagnosis().as_deref(),
            Some("Heart Palpitations")
        );
    }

    #[test]
    fn separate_instances_have_separate_counters() {
        let mut first = SchedulingService::new();
        let mut second = SchedulingService::new();
        first.add_doctor("Dr. A", "General").unwrap();
        first.add_doctor("Dr. B", "General").unwrap();
        assert_eq!(second.add_doctor("Dr. C", "General").unwrap().id, 1);
    }
}
