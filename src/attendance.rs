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
use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{
    AttendanceStatus, DayState, Employee, EmployeeType, Month, MonthlyAttendance,
};
use crate::scope;
use crate::session::Session;

/// The minimal remote mutation a status transition boils down to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create(AttendanceStatus),
    Update(AttendanceStatus),
    Delete,
}

/// Maps a requested transition onto the remote mutation, or `None` when the
/// day is already where the transition points.
///
/// ON_LEAVE is terminal in both directions: a day on leave cannot be edited,
/// and the only way onto leave is an approved request, never a manual
/// transition. A day that is implicitly absent has no record, so the only
/// mutation that can touch it is a create.
pub fn plan_transition(
    day: &DayState,
    target: AttendanceStatus,
) -> Result<Option<Mutation>, Error> {
    if day.status() == AttendanceStatus::OnLeave {
        return Err(Error::Scope("a day on leave cannot be edited"));
    }
    if target == AttendanceStatus::OnLeave {
        return Err(Error::Scope(
            "ON_LEAVE is only entered through an approved leave request",
        ));
    }
    Ok(match (day, target) {
        (DayState::Implicit(_), AttendanceStatus::Absent) => None,
        (DayState::Implicit(_), status) => Some(Mutation::Create(status)),
        (DayState::Existing(_), AttendanceStatus::Absent) => Some(Mutation::Delete),
        (DayState::Existing(_), status) => Some(Mutation::Update(status)),
    })
}

/// Drives per-day attendance for one scoped employee and month window.
///
/// The view is never patched piecemeal: every successful mutation refetches
/// the whole window so the server-computed aggregates stay authoritative.
pub struct AttendanceEngine {
    api: ApiClient,
    selected_employee_id: Option<String>,
    selected_month: Option<Month>,
    view: Option<MonthlyAttendance>,
    last_error: Option<String>,
}

impl AttendanceEngine {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            selected_employee_id: None,
            selected_month: None,
            view: None,
            last_error: None,
        }
    }

    /// Points the engine at another employee's records (the directory
    /// selection), or back at the acting subject with `None`.
    pub fn select_employee(&mut self, employee_id: Option<String>) {
        self.selected_employee_id = employee_id;
    }

    pub fn select_month(&mut self, month: Option<Month>) {
        self.selected_month = month;
    }

    pub fn view(&self) -> Option<&MonthlyAttendance> {
        self.view.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The employee a fetch or mutation applies to: the directory selection
    /// when one is set, else the acting subject.
    pub fn effective_target(&self, session: &Session) -> String {
        self.selected_employee_id
            .clone()
            .unwrap_or_else(|| session.employee.employee_id.clone())
    }

    pub fn effective_month(&self) -> Month {
        self.selected_month.unwrap_or_else(Month::current)
    }

    /// How the state machine sees `date` right now. Days missing from the
    /// fetched window fall back to implicit ABSENT.
    pub fn day_state(&self, date: NaiveDate) -> DayState {
        self.view
            .as_ref()
            .and_then(|view| view.logs.iter().find(|record| record.date == date))
            .map(DayState::from_record)
            .unwrap_or(DayState::Implicit(date))
    }

    /// Replaces the local view wholesale with the authoritative monthly
    /// fetch. A failed fetch keeps the previous view and records the error.
    pub async fn refresh(&mut self, session: &Session) -> Result<(), Error> {
        let target = self.effective_target(session);
        let access = scope::can_act(session, &target);
        if !access.can_view {
            return Err(Error::Scope("cannot view another employee's attendance"));
        }

        let month = self.effective_month();
        // Privileged actors always address the target explicitly; everyone
        // else gets their own window from the bare endpoint.
        let privileged = session.employee.employee_type == EmployeeType::Privileged;
        let explicit = privileged.then_some(target.as_str());

        trace!("Fetching attendance for {target}, window {month}");
        match self
            .api
            .monthly_attendance(&session.token, month, explicit)
            .await
        {
            Ok(view) => {
                self.view = Some(view);
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

    /// Requests a status transition for one day of the scoped employee.
    ///
    /// Disallowed transitions come back as `Error::Scope` before anything is
    /// sent. Remote failures land in [`AttendanceEngine::last_error`] with
    /// the previous view kept; nothing was applied optimistically, so there
    /// is nothing to roll back.
    pub async fn set_status(
        &mut self,
        session: &Session,
        date: NaiveDate,
        target_status: AttendanceStatus,
    ) -> Result<(), Error> {
        let target = self.effective_target(session);
        let access = scope::can_act(session, &target);
        if access.is_self {
            return Err(Error::Scope("own attendance cannot be edited"));
        }
        if !access.can_mutate {
            return Err(Error::Scope("cannot edit another employee's attendance"));
        }

        let day = self.day_state(date);
        let Some(mutation) = plan_transition(&day, target_status)? else {
            trace!("{date} is already absent, nothing to send");
            return Ok(());
        };

        debug!("Applying {mutation:?} to {date} for {target}");
        let result = match mutation {
            Mutation::Create(status) => {
                self.api
                    .create_attendance(&session.token, &target, date, status)
                    .await
            }
            Mutation::Update(status) => {
                self.api
                    .update_attendance(&session.token, date, &target, status)
                    .await
            }
            Mutation::Delete => {
                self.api
                    .delete_attendance(&session.token, date, &target)
                    .await
            }
        };

        match result {
            Ok(()) => self.refresh(session).await,
            Err(Error::Auth) => Err(Error::Auth),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Ok(())
            }
        }
    }
}

/// Yearly paid-leave quota the dashboard counts usage against.
pub const PAID_LEAVE_QUOTA: u32 = 15;

/// The four dashboard stat lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLines {
    pub absent_this_month: String,
    pub absent_last_month: String,
    pub used_leaves: String,
    pub remaining_leaves: String,
}

/// Renders the monthly summary the way the dashboard words it.
///
/// TODO: the singular/plural thresholds on the two leave lines test the
/// profile's balance against 14 and 1 while the number shown comes from the
/// monthly summary; confirm the intended copy with product before touching
/// either side.
pub fn summary_lines(view: &MonthlyAttendance, profile: &Employee) -> SummaryLines {
    let days = |count: u32| format!("{} {}", count, if count == 1 { "day" } else { "days" });
    SummaryLines {
        absent_this_month: days(view.absent_this_month),
        absent_last_month: days(view.absent_last_month),
        used_leaves: format!(
            "{} {}",
            PAID_LEAVE_QUOTA.saturating_sub(view.available_paid_leaves),
            if profile.available_paid_leaves == 14 {
                "leave"
            } else {
                "leaves"
            }
        ),
        remaining_leaves: format!(
            "{} {}",
            view.available_paid_leaves,
            if profile.available_paid_leaves == 1 {
                "leave"
            } else {
                "leaves"
            }
        ),
    }
}
