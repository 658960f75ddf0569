/// Interactive text menu for the clinic scheduling system.
///
/// The console owns no records. It reads choices and field values,
/// hands them to the scheduling service and prints what comes back.

use crate::error::SchedulingError;
use crate::models::NewPatient;
use crate::service::SchedulingService;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

enum Step {
    Continue,
    Exit,
}

pub struct ConsoleApp<'a, R, W> {
    service: &'a mut SchedulingService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> ConsoleApp<'a, R, W> {
    pub fn new(service: &'a mut SchedulingService, input: R, output: W) -> Self {
        ConsoleApp {
            service,
            input,
            output,
        }
    }

    fn print_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(60))?;
        writeln!(self.output, "       CLINIC DESK")?;
        writeln!(self.output, "{}", "=".repeat(60))
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Main Menu ---")?;
        writeln!(self.output, "1. Add patient")?;
        writeln!(self.output, "2. Add doctor")?;
        writeln!(self.output, "3. Schedule appointment")?;
        writeln!(self.output, "4. View patients")?;
        writeln!(self.output, "5. View doctors")?;
        writeln!(self.output, "6. View appointments")?;
        writeln!(self.output, "7. Update patient diagnosis")?;
        writeln!(self.output, "8. Exit")?;
        writeln!(self.output, "{}", "-".repeat(20))
    }

    /// Prompt for one line. `None` means the input is exhausted.
    fn get_input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for an optional field; a blank answer means "not given".
    fn get_optional_input(&mut self, prompt: &str) -> io::Result<Option<Option<String>>> {
        Ok(self
            .get_input(prompt)?
            .map(|value| if value.is_empty() { None } else { Some(value) }))
    }

    /// Prompt for a record identity. `Ok(Some(None))` means the text was not a number.
    fn get_id_input(&mut self, prompt: &str) -> io::Result<Option<Option<u32>>> {
        Ok(self.get_input(prompt)?.map(|value| value.parse::<u32>().ok()))
    }

    fn report_error(&mut self, err: &SchedulingError) -> io::Result<()> {
        writeln!(self.output, "\nError: {}", err)
    }

    fn report_invalid_id(&mut self) -> io::Result<()> {
        debug!("non-numeric id entered");
        writeln!(self.output, "\nInvalid ID. Please enter a number.")
    }

    fn add_patient(&mut self) -> io::Result<Step> {
        writeln!(self.output, "\n--- Add New Patient ---")?;

        let Some(name) = self.get_input("Name")? else {
            return Ok(Step::Exit);
        };
        let Some(age) = self.get_optional_input("Age")? else {
            return Ok(Step::Exit);
        };
        let Some(diagnosis) = self.get_optional_input("Diagnosis")? else {
            return Ok(Step::Exit);
        };
        let Some(contact) = self.get_optional_input("Contact info (optional)")? else {
            return Ok(Step::Exit);
        };

        let input = NewPatient {
            name,
            age,
            diagnosis,
            contact,
        };
        match self.service.add_patient(input) {
            Ok(patient) => writeln!(
                self.output,
                "\nPatient added successfully! Assigned ID {}",
                patient.id
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(Step::Continue)
    }

    fn add_doctor(&mut self) -> io::Result<Step> {
        writeln!(self.output, "\n--- Add New Doctor ---")?;

        let Some(name) = self.get_input("Name")? else {
            return Ok(Step::Exit);
        };
        let Some(specialization) = self.get_input("Specialization")? else {
            return Ok(Step::Exit);
        };

        match self.service.add_doctor(&name, &specialization) {
            Ok(doctor) => writeln!(
                self.output,
                "\nDoctor added successfully! Assigned ID {}",
                doctor.id
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(Step::Continue)
    }

    fn schedule_appointment(&mut self) -> io::Result<Step> {
        writeln!(self.output, "\n--- Schedule Appointment ---")?;

        let Some(patient_id) = self.get_id_input("Patient ID")? else {
            return Ok(Step::Exit);
        };
        let Some(doctor_id) = self.get_id_input("Doctor ID")? else {
            return Ok(Step::Exit);
        };
        let date_prompt = format!("Date ({})", self.service.date_format().expected());
        let Some(when) = self.get_input(&date_prompt)? else {
            return Ok(Step::Exit);
        };

        let (Some(patient_id), Some(doctor_id)) = (patient_id, doctor_id) else {
            self.report_invalid_id()?;
            return Ok(Step::Continue);
        };

        match self.service.schedule_appointment(patient_id, doctor_id, &when) {
            Ok(appointment) => writeln!(
                self.output,
                "\nAppointment scheduled successfully! Assigned ID {}",
                appointment.id
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(Step::Continue)
    }

    fn update_diagnosis(&mut self) -> io::Result<Step> {
        writeln!(self.output, "\n--- Update Patient Diagnosis ---")?;

        let Some(patient_id) = self.get_id_input("Patient ID")? else {
            return Ok(Step::Exit);
        };
        let Some(diagnosis) = self.get_input("New diagnosis")? else {
            return Ok(Step::Exit);
        };

        let Some(patient_id) = patient_id else {
            self.report_invalid_id()?;
            return Ok(Step::Continue);
        };

        match self.service.update_patient_diagnosis(patient_id, &diagnosis) {
            Ok(patient) => writeln!(self.output, "\nDiagnosis updated: {}", patient)?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(Step::Continue)
    }

    fn view<T: Display>(&mut self, title: &str, items: &[T]) -> io::Result<Step> {
        writeln!(self.output, "\n--- {} ({}) ---", title, items.len())?;

        if items.is_empty() {
            writeln!(self.output, "No items found.")?;
        }
        for item in items {
            writeln!(self.output, "{}\n", item)?;
        }
        Ok(Step::Continue)
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Step> {
        match choice.parse::<u32>() {
            Ok(1) => self.add_patient(),
            Ok(2) => self.add_doctor(),
            Ok(3) => self.schedule_appointment(),
            Ok(4) => {
                let patients = self.service.list_patients();
                self.view("Patients", &patients)
            }
            Ok(5) => {
                let doctors = self.service.list_doctors();
                self.view("Doctors", &doctors)
            }
            Ok(6) => {
                let appointments = self.service.list_appointments();
                self.view("Appointments", &appointments)
            }
            Ok(7) => self.update_diagnosis(),
            Ok(8) => Ok(Step::Exit),
            _ => {
                debug!(choice, "unknown menu choice");
                writeln!(self.output, "Invalid choice")?;
                Ok(Step::Continue)
            }
        }
    }

    /// Run the menu loop until the user exits or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        info!("console session started");
        self.print_header()?;

        loop {
            self.print_menu()?;

            let Some(choice) = self.get_input("Enter choice")? else {
                break;
            };
            if let Step::Exit = self.dispatch(&choice)? {
                break;
            }
        }

        writeln!(self.output, "\nGoodbye!")?;
        self.output.flush()?;
        info!(
            doctors = self.service.doctor_count(),
            patients = self.service.patient_count(),
            appointments = self.service.appointment_count(),
            "console session ended"
        );
        Ok(())
    }
}
