/*
HeatSeek: client-side core for the HeatSeek attendance tracker.
Copyright (C) 2024 HeatSeek

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use tracing::trace;

use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{Employee, EmployeeType};
use crate::session::Session;

/// Lookup of the employees a privileged actor may pivot into. Purely a
/// read; the chosen id is handed to the attendance engine, never to the
/// leave lifecycle.
pub struct EmployeeDirectory {
    api: ApiClient,
    employees: Vec<Employee>,
    last_error: Option<String>,
}

impl EmployeeDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            employees: Vec::new(),
            last_error: None,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn find(&self, employee_id: &str) -> Option<&Employee> {
        self.employees
            .iter()
            .find(|employee| employee.employee_id == employee_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Privileged-only. A failure here only empties the selector; it never
    /// blocks the actor from viewing their own attendance.
    pub async fn refresh(&mut self, session: &Session) -> Result<(), Error> {
        if session.employee.employee_type != EmployeeType::Privileged {
            return Err(Error::Scope("the employee directory is restricted"));
        }
        match self.api.list_employees(&session.token).await {
            Ok(employees) => {
                trace!("Fetched {} employees", employees.len());
                self.employees = employees;
                self.last_error = None;
                Ok(())
            }
            Err(Error::Auth) => Err(Error::Auth),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(employee_type: EmployeeType) -> Session {
        Session {
            token: "tok".into(),
            employee: Employee {
                employee_id: "EMP-2".into(),
                first_name: "Rhea".into(),
                last_name: "Nair".into(),
                employee_type,
                available_paid_leaves: 12,
            },
        }
    }

    #[tokio::test]
    async fn standard_actors_are_turned_away_before_any_request() {
        let mut directory = EmployeeDirectory::new(ApiClient::new("http://127.0.0.1:9"));
        let err = directory
            .refresh(&session(EmployeeType::Standard))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Scope(_)));
        assert!(directory.employees().is_empty());
        assert!(directory.last_error().is_none());
    }
}
