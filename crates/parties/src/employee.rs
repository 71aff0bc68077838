use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use northwind_core::{DomainError, DomainResult, Entity, entity_id};

entity_id!(
    /// Employee identifier (`Employees.EmployeeID`).
    EmployeeId,
    "EmployeeId"
);

/// Average length of a year in days, used for tenure.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Read model: Employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    first_name: String,
    last_name: String,
    title: Option<String>,
    hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> DomainResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() {
            return Err(DomainError::validation("first name cannot be empty"));
        }
        if last_name.trim().is_empty() {
            return Err(DomainError::validation("last name cannot be empty"));
        }

        Ok(Self {
            id,
            first_name,
            last_name,
            title: None,
            hire_date: None,
        })
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_hire_date(mut self, hire_date: Option<NaiveDate>) -> Self {
        self.hire_date = hire_date;
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last", the way reports name an employee.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn hire_date(&self) -> Option<NaiveDate> {
        self.hire_date
    }

    /// Years elapsed between the hire date and `as_of`.
    ///
    /// `None` when the hire date is unknown. A hire date after `as_of` yields a
    /// negative tenure; callers decide whether to keep it.
    pub fn tenure_years(&self, as_of: NaiveDate) -> Option<f64> {
        let hired = self.hire_date?;
        let days = (as_of - hired).num_days() as f64;
        Some(days / DAYS_PER_YEAR)
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tenure_uses_average_year_length() {
        let employee = Employee::new(EmployeeId(1), "Nancy", "Davolio")
            .unwrap()
            .with_hire_date(Some(date(2000, 1, 1)));

        // 2000-01-01 .. 2010-01-01 spans 3653 days.
        let tenure = employee.tenure_years(date(2010, 1, 1)).unwrap();
        assert!((tenure - 3653.0 / 365.25).abs() < 1e-9);
        assert_eq!(tenure.trunc() as i64, 10);
    }

    #[test]
    fn tenure_is_none_without_hire_date() {
        let employee = Employee::new(EmployeeId(2), "Andrew", "Fuller").unwrap();
        assert_eq!(employee.tenure_years(date(2024, 6, 1)), None);
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let employee = Employee::new(EmployeeId(3), "Janet", "Leverling")
            .unwrap()
            .with_title(Some("Sales Representative".to_string()));
        assert_eq!(employee.full_name(), "Janet Leverling");
        assert_eq!(employee.title(), Some("Sales Representative"));
    }

    #[test]
    fn rejects_missing_last_name() {
        assert!(matches!(
            Employee::new(EmployeeId(4), "Margaret", " "),
            Err(DomainError::Validation(_))
        ));
    }
}
