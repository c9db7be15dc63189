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

//! Client-side core for the HeatSeek workforce attendance tracker.
//!
//! The session store gates every remote call, authorization scope is
//! recomputed from it on each operation, and the two engines reconcile
//! local state with the remote service in their own ways: attendance
//! refetches its month window wholesale (the summary aggregates are
//! server-computed), while decided leave requests are patched in place.
//! Rendering, routing and the service itself live elsewhere.

pub mod api;
pub mod attendance;
pub mod config;
pub mod directory;
pub mod error;
pub mod leave;
pub mod logging;
pub mod models;
pub mod scope;
pub mod session;

pub use api::ApiClient;
pub use attendance::{AttendanceEngine, Mutation};
pub use config::Config;
pub use directory::EmployeeDirectory;
pub use error::Error;
pub use leave::{Decision, LeaveLifecycle, StagedDecision};
pub use models::{
    AttendanceRecord, AttendanceStatus, DayState, Employee, EmployeeType, LeaveRequest,
    LeaveStatus, Month, MonthlyAttendance,
};
pub use scope::{can_act, can_decide, Scope};
pub use session::{sign_in, Session, SessionStore};
