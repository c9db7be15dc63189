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
use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeType {
    Standard,
    /// May view and alter other employees' records and decide leave requests.
    Privileged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    /// Terminal. Entered only through leave approval, never set by hand.
    OnLeave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
}

/// Profile snapshot fetched at login time. Other employees' profiles only
/// come in through directory lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_type: EmployeeType,
    pub available_paid_leaves: u32,
}

/// The part of the login response the client consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginReply {
    pub token: String,
    pub employee_id: String,
}

/// One day of one employee's month window, as the server reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    /// Weekday label, passed through as the server renders it.
    pub day: String,
    pub status: AttendanceStatus,
}

/// A monthly fetch result. The aggregates are recomputed server-side on
/// every fetch, which is why the view is always replaced wholesale.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyAttendance {
    pub logs: Vec<AttendanceRecord>,
    pub absent_this_month: u32,
    pub absent_last_month: u32,
    pub available_paid_leaves: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LeaveRequest {
    pub uuid: Uuid,
    pub employee: Employee,
    pub date: NaiveDate,
    #[serde(default)]
    pub message: Option<String>,
    pub status: LeaveStatus,
    #[serde(default)]
    pub response_message: Option<String>,
}

/// Paginated list envelope used by the employees and leave-request
/// endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
}

/// A `yyyy-mm` query window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The current calendar month on the local clock.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Parses the `yyyy-mm` form used in URLs and month pickers.
    pub fn parse(value: &str) -> Option<Self> {
        let (year, month) = value.split_once('-')?;
        let year = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A calendar day as the attendance state machine sees it.
///
/// A day the server reports as ABSENT has no persisted row behind it, so it
/// carries no record to patch or delete. Modelling that as its own variant
/// makes the create/update/delete choice a total match instead of a null
/// check.
#[derive(Clone, Debug, PartialEq)]
pub enum DayState {
    Existing(AttendanceRecord),
    Implicit(NaiveDate),
}

impl DayState {
    pub fn from_record(record: &AttendanceRecord) -> Self {
        match record.status {
            AttendanceStatus::Absent => DayState::Implicit(record.date),
            _ => DayState::Existing(record.clone()),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            DayState::Existing(record) => record.date,
            DayState::Implicit(date) => *date,
        }
    }

    pub fn status(&self) -> AttendanceStatus {
        match self {
            DayState::Existing(record) => record.status,
            DayState::Implicit(_) => AttendanceStatus::Absent,
        }
    }
}
