use crate::domain::park::Park;
use crate::utils::error::{ParkError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_EMPLOYEE_TASKS: usize = 5;
pub const CORPORATE_DISCOUNT_THRESHOLD: u32 = 5;
pub const CORPORATE_DISCOUNT: f64 = 0.10;
pub const VISITS_PER_DISCOUNT_STEP: u32 = 10;
pub const DISCOUNT_STEP_PERCENT: f64 = 5.0;

/// Fields shared by every kind of user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            is_admin,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn contact_line(&self) -> String {
        format!(
            "Name: {}, Email: {}, Phone: {}, User ID: {}",
            self.name, self.email, self.phone, self.id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residential {
    pub remaining_events: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalOutcome {
    Rented { park: String, date: String },
    NoEventsLeft,
}

impl fmt::Display for RentalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalOutcome::Rented { park, date } => {
                write!(f, "Park '{}' rented for the event on {}", park, date)
            }
            RentalOutcome::NoEventsLeft => write!(f, "No events left to rent the park"),
        }
    }
}

impl Residential {
    /// Consumes one remaining event. Park availability is not consulted.
    pub fn rent_park(&mut self, park: &Park, date: &str) -> RentalOutcome {
        if self.remaining_events == 0 {
            return RentalOutcome::NoEventsLeft;
        }
        self.remaining_events -= 1;
        RentalOutcome::Rented {
            park: park.name.clone(),
            date: date.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corporate {
    pub company: String,
    pub events_organized: u32,
}

impl Corporate {
    pub fn register_event(&mut self) {
        self.events_organized += 1;
    }

    pub fn discount(&self) -> f64 {
        if self.events_organized >= CORPORATE_DISCOUNT_THRESHOLD {
            CORPORATE_DISCOUNT
        } else {
            0.0
        }
    }

    pub fn event_cost(&self, base_rate: f64, attendees: u32) -> f64 {
        base_rate * f64::from(attendees) * (1.0 - self.discount())
    }
}

/// A corporate account booking from abroad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InternationalRecord")]
pub struct International {
    pub corporate: Corporate,
    origin_country: String,
    pub needs_translator: bool,
    international_rate: f64,
}

#[derive(Deserialize)]
struct InternationalRecord {
    corporate: Corporate,
    origin_country: String,
    needs_translator: bool,
    international_rate: f64,
}

impl TryFrom<InternationalRecord> for International {
    type Error = ParkError;

    fn try_from(record: InternationalRecord) -> Result<Self> {
        International::new(
            record.corporate,
            record.origin_country,
            record.needs_translator,
            record.international_rate,
        )
    }
}

impl International {
    pub fn new(
        corporate: Corporate,
        origin_country: impl Into<String>,
        needs_translator: bool,
        international_rate: f64,
    ) -> Result<Self> {
        let origin_country = origin_country.into();
        validate_non_empty_string("origin_country", &origin_country)?;
        validate_positive("international_rate", international_rate)?;
        Ok(Self {
            corporate,
            origin_country,
            needs_translator,
            international_rate,
        })
    }

    pub fn origin_country(&self) -> &str {
        &self.origin_country
    }

    pub fn set_origin_country(&mut self, country: impl Into<String>) -> Result<()> {
        let country = country.into();
        validate_non_empty_string("origin_country", &country)?;
        self.origin_country = country;
        Ok(())
    }

    pub fn international_rate(&self) -> f64 {
        self.international_rate
    }

    pub fn set_international_rate(&mut self, rate: f64) -> Result<()> {
        validate_positive("international_rate", rate)?;
        self.international_rate = rate;
        Ok(())
    }

    pub fn book_global_event(&self) -> String {
        let mut message = "Park booked for the international event.".to_string();
        if self.needs_translator {
            message.push_str(" A translator has been assigned to the event.");
        }
        message
    }

    pub fn global_event_cost(&self, attendees: u32) -> f64 {
        self.international_rate * f64::from(attendees)
    }

    fn extras_line(&self) -> String {
        format!(
            "Origin country: {}, Needs translator: {}, International rate: {}",
            self.origin_country,
            if self.needs_translator { "Yes" } else { "No" },
            self.international_rate
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequent {
    pub total_visits: u32,
    pub discount_percent: f64,
}

impl Frequent {
    /// Every tenth visit raises the discount by five points.
    pub fn register_visit(&mut self) {
        self.total_visits += 1;
        if self.total_visits % VISITS_PER_DISCOUNT_STEP == 0 {
            self.discount_percent += DISCOUNT_STEP_PERCENT;
        }
    }

    pub fn discount_for(&self, reservation_cost: f64) -> f64 {
        reservation_cost * (self.discount_percent / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAssignment {
    Assigned(String),
    CapacityReached,
}

impl fmt::Display for TaskAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAssignment::Assigned(task) => write!(f, "Task assigned: {}", task),
            TaskAssignment::CapacityReached => write!(
                f,
                "Employee already has the maximum of {} tasks",
                MAX_EMPLOYEE_TASKS
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeRecord")]
pub struct Employee {
    pub role: String,
    pub salary: f64,
    tasks: Vec<String>,
}

#[derive(Deserialize)]
struct EmployeeRecord {
    role: String,
    salary: f64,
    tasks: Vec<String>,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = ParkError;

    fn try_from(record: EmployeeRecord) -> Result<Self> {
        if record.tasks.len() > MAX_EMPLOYEE_TASKS {
            return Err(ParkError::invalid_value(
                "tasks",
                record.tasks.len(),
                format!("An employee holds at most {} tasks", MAX_EMPLOYEE_TASKS),
            ));
        }
        Ok(Self {
            role: record.role,
            salary: record.salary,
            tasks: record.tasks,
        })
    }
}

impl Employee {
    pub fn new(role: impl Into<String>, salary: f64) -> Self {
        Self {
            role: role.into(),
            salary,
            tasks: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn assign_task(&mut self, task: impl Into<String>) -> TaskAssignment {
        if self.tasks.len() >= MAX_EMPLOYEE_TASKS {
            return TaskAssignment::CapacityReached;
        }
        let task = task.into();
        self.tasks.push(task.clone());
        TaskAssignment::Assigned(task)
    }

    pub fn task_list(&self) -> String {
        if self.tasks.is_empty() {
            return "No assigned tasks.".to_string();
        }
        self.tasks.iter().map(|t| format!("{}\n", t)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserKind {
    Residential(Residential),
    Corporate(Corporate),
    Frequent(Frequent),
    International(International),
    Employee(Employee),
}

impl UserKind {
    pub fn label(&self) -> &'static str {
        match self {
            UserKind::Residential(_) => "residential",
            UserKind::Corporate(_) => "corporate",
            UserKind::Frequent(_) => "frequent",
            UserKind::International(_) => "international",
            UserKind::Employee(_) => "employee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub profile: UserProfile,
    pub kind: UserKind,
}

impl User {
    pub fn new(profile: UserProfile, kind: UserKind) -> Self {
        Self { profile, kind }
    }

    pub fn id(&self) -> &str {
        self.profile.id()
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Plain-text description of the user and its variant data.
    pub fn details(&self) -> String {
        let contact = self.profile.contact_line();
        match &self.kind {
            UserKind::Residential(r) => format!(
                "Residential user - {}, Remaining events: {}",
                contact, r.remaining_events
            ),
            UserKind::Corporate(c) => format!(
                "Corporate user - {}, Company: {}, Events organized: {}",
                contact, c.company, c.events_organized
            ),
            UserKind::Frequent(fr) => format!(
                "Frequent user - {}, Total visits: {}, Discount: {}%",
                contact, fr.total_visits, fr.discount_percent
            ),
            UserKind::International(i) => format!(
                "Corporate user - {}, Company: {}, Events organized: {}, {}",
                contact,
                i.corporate.company,
                i.corporate.events_organized,
                i.extras_line()
            ),
            UserKind::Employee(e) => format!(
                "Employee - Name: {}, Role: {}, Salary: {}, Tasks: {}",
                self.profile.name,
                e.role,
                e.salary,
                e.task_list()
            ),
        }
    }

    pub fn summary(&self) -> String {
        let label = match &self.kind {
            UserKind::Residential(_) => "Residential user information",
            UserKind::Corporate(_) => "Corporate user information",
            UserKind::Frequent(_) => "Frequent user information",
            UserKind::International(_) => "International user information",
            UserKind::Employee(_) => "Employee information",
        };
        format!("{}: {}", label, self.details())
    }

    /// Corporate account of a corporate or international user.
    pub fn corporate_mut(&mut self) -> Option<&mut Corporate> {
        match &mut self.kind {
            UserKind::Corporate(c) => Some(c),
            UserKind::International(i) => Some(&mut i.corporate),
            _ => None,
        }
    }

    pub fn corporate(&self) -> Option<&Corporate> {
        match &self.kind {
            UserKind::Corporate(c) => Some(c),
            UserKind::International(i) => Some(&i.corporate),
            _ => None,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
