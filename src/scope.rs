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

//! Pure authorization decisions. Nothing here touches the network or caches
//! anything; callers recompute scope from the latest session snapshot on
//! every operation.

use crate::models::{EmployeeType, LeaveRequest, LeaveStatus};
use crate::session::Session;

/// The computed permission set for an actor against one employee's records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scope {
    pub is_self: bool,
    pub can_view: bool,
    /// Attendance mutation right. Never true for the actor's own record,
    /// privileged or not.
    pub can_mutate: bool,
}

pub fn can_act(session: &Session, target_employee_id: &str) -> Scope {
    let is_self = session.employee.employee_id == target_employee_id;
    let privileged = session.employee.employee_type == EmployeeType::Privileged;
    Scope {
        is_self,
        can_view: is_self || privileged,
        can_mutate: privileged && !is_self,
    }
}

/// Whether the actor may approve or deny the given request: privileged,
/// not the requester, and the request still pending.
pub fn can_decide(session: &Session, request: &LeaveRequest) -> bool {
    session.employee.employee_type == EmployeeType::Privileged
        && request.employee.employee_id != session.employee.employee_id
        && request.status == LeaveStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn employee(id: &str, employee_type: EmployeeType) -> Employee {
        Employee {
            employee_id: id.into(),
            first_name: "Asha".into(),
            last_name: "Varma".into(),
            employee_type,
            available_paid_leaves: 10,
        }
    }

    fn session(id: &str, employee_type: EmployeeType) -> Session {
        Session {
            token: "tok".into(),
            employee: employee(id, employee_type),
        }
    }

    fn request(requester: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            uuid: Uuid::new_v4(),
            employee: employee(requester, EmployeeType::Standard),
            date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            message: None,
            status,
            response_message: None,
        }
    }

    #[test]
    fn nobody_mutates_their_own_attendance() {
        for employee_type in [EmployeeType::Standard, EmployeeType::Privileged] {
            let scope = can_act(&session("EMP-1", employee_type), "EMP-1");
            assert!(scope.is_self);
            assert!(scope.can_view);
            assert!(!scope.can_mutate);
        }
    }

    #[test]
    fn privileged_actors_reach_other_employees() {
        let scope = can_act(&session("EMP-1", EmployeeType::Privileged), "EMP-2");
        assert!(!scope.is_self);
        assert!(scope.can_view);
        assert!(scope.can_mutate);
    }

    #[test]
    fn standard_actors_see_only_themselves() {
        let scope = can_act(&session("EMP-2", EmployeeType::Standard), "EMP-1");
        assert!(!scope.can_view);
        assert!(!scope.can_mutate);
    }

    #[test]
    fn deciding_takes_privilege_a_pending_request_and_another_requester() {
        let privileged = session("EMP-1", EmployeeType::Privileged);
        assert!(can_decide(&privileged, &request("EMP-2", LeaveStatus::Pending)));

        // Own request, already-decided request, or no privilege.
        assert!(!can_decide(&privileged, &request("EMP-1", LeaveStatus::Pending)));
        assert!(!can_decide(&privileged, &request("EMP-2", LeaveStatus::Approved)));
        assert!(!can_decide(&privileged, &request("EMP-2", LeaveStatus::Denied)));
        let standard = session("EMP-3", EmployeeType::Standard);
        assert!(!can_decide(&standard, &request("EMP-2", LeaveStatus::Pending)));
    }
}
