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
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{EmployeeType, LeaveRequest, LeaveStatus};
use crate::scope;
use crate::session::Session;

/// The two ways a pending request can be decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    fn resulting_status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Deny => LeaveStatus::Denied,
        }
    }
}

/// A decision that has been picked but not yet confirmed. Nothing reaches
/// the server until [`LeaveLifecycle::confirm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedDecision {
    pub uuid: Uuid,
    pub decision: Decision,
}

/// Governs leave-request submission and the approval lifecycle.
///
/// The cached list is the server's ordering (newest date first). Decisions
/// patch the one affected entry in place instead of refetching; the list has
/// no server-derived aggregates, so nothing else can go stale.
pub struct LeaveLifecycle {
    api: ApiClient,
    requests: Vec<LeaveRequest>,
    staged: Option<StagedDecision>,
    last_error: Option<String>,
}

impl LeaveLifecycle {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            requests: Vec::new(),
            staged: None,
            last_error: None,
        }
    }

    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn staged(&self) -> Option<StagedDecision> {
        self.staged
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Privileged actors see every request, everyone else only their own.
    /// The scoping comes from the actor's type alone, never from a
    /// directory selection.
    pub async fn refresh(&mut self, session: &Session) -> Result<(), Error> {
        let own_only = (session.employee.employee_type != EmployeeType::Privileged)
            .then_some(session.employee.employee_id.as_str());
        match self.api.list_leave_requests(&session.token, own_only).await {
            Ok(requests) => {
                trace!("Fetched {} leave requests", requests.len());
                self.requests = requests;
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

    /// Submits a request for the acting subject. The server assigns PENDING
    /// and enforces its own constraints; a rejection surfaces the server's
    /// message. Success refetches the whole list.
    pub async fn submit(
        &mut self,
        session: &Session,
        date: NaiveDate,
        message: &str,
    ) -> Result<(), Error> {
        let result = self
            .api
            .submit_leave_request(&session.token, &session.employee.employee_id, date, message)
            .await;
        match result {
            Ok(()) => self.refresh(session).await,
            Err(Error::Auth) => Err(Error::Auth),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Ok(())
            }
        }
    }

    /// Stages a decision for later confirmation. Rejected unless the actor
    /// may decide this request right now.
    pub fn stage(&mut self, session: &Session, uuid: Uuid, decision: Decision) -> Result<(), Error> {
        let request = self
            .requests
            .iter()
            .find(|request| request.uuid == uuid)
            .ok_or(Error::Scope("unknown leave request"))?;
        if !scope::can_decide(session, request) {
            return Err(Error::Scope("cannot decide this leave request"));
        }
        self.staged = Some(StagedDecision { uuid, decision });
        Ok(())
    }

    /// Drops the staged decision with no remote effect.
    pub fn cancel(&mut self) {
        self.staged = None;
    }

    /// Issues the staged decision with an optional response message.
    ///
    /// Scope is re-evaluated against the latest snapshot, not the one the
    /// action was staged under. On success only the decided entry changes,
    /// and only its status and response message; order and every other
    /// entry stay put. The staged action is consumed either way.
    pub async fn confirm(&mut self, session: &Session, response_message: &str) -> Result<(), Error> {
        let Some(StagedDecision { uuid, decision }) = self.staged.take() else {
            trace!("No staged decision to confirm");
            return Ok(());
        };

        let request = self
            .requests
            .iter()
            .find(|request| request.uuid == uuid)
            .ok_or(Error::Scope("unknown leave request"))?;
        if !scope::can_decide(session, request) {
            return Err(Error::Scope("cannot decide this leave request"));
        }

        debug!("Confirming {decision:?} for leave request {uuid}");
        let result = match decision {
            Decision::Approve => {
                self.api
                    .approve_leave_request(&session.token, uuid, response_message)
                    .await
            }
            Decision::Deny => {
                self.api
                    .deny_leave_request(&session.token, uuid, response_message)
                    .await
            }
        };

        match result {
            Ok(()) => {
                patch_decided(
                    &mut self.requests,
                    uuid,
                    decision.resulting_status(),
                    response_message,
                );
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

/// In-place patch of the decided entry: status and response message only.
fn patch_decided(
    requests: &mut [LeaveRequest],
    uuid: Uuid,
    status: LeaveStatus,
    response_message: &str,
) {
    for request in requests.iter_mut().filter(|request| request.uuid == uuid) {
        request.status = status;
        request.response_message = Some(response_message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;

    fn employee(id: &str, employee_type: EmployeeType) -> Employee {
        Employee {
            employee_id: id.into(),
            first_name: "Asha".into(),
            last_name: "Varma".into(),
            employee_type,
            available_paid_leaves: 12,
        }
    }

    fn session(id: &str, employee_type: EmployeeType) -> Session {
        Session {
            token: "tok".into(),
            employee: employee(id, employee_type),
        }
    }

    fn request(requester: &str, day: u32, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            uuid: Uuid::new_v4(),
            employee: employee(requester, EmployeeType::Standard),
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            message: Some("family visit".into()),
            status,
            response_message: None,
        }
    }

    fn lifecycle_with(requests: Vec<LeaveRequest>) -> LeaveLifecycle {
        let mut lifecycle = LeaveLifecycle::new(ApiClient::new("http://127.0.0.1:9"));
        lifecycle.requests = requests;
        lifecycle
    }

    #[test]
    fn patching_touches_exactly_one_entry_and_keeps_order() {
        let mut requests = vec![
            request("EMP-2", 9, LeaveStatus::Pending),
            request("EMP-3", 7, LeaveStatus::Pending),
            request("EMP-2", 4, LeaveStatus::Denied),
        ];
        let target = requests[1].uuid;
        let before: Vec<Uuid> = requests.iter().map(|request| request.uuid).collect();

        patch_decided(&mut requests, target, LeaveStatus::Approved, "have fun");

        let after: Vec<Uuid> = requests.iter().map(|request| request.uuid).collect();
        assert_eq!(before, after);
        assert_eq!(requests[1].status, LeaveStatus::Approved);
        assert_eq!(requests[1].response_message.as_deref(), Some("have fun"));
        // Untouched fields and neighbours.
        assert_eq!(requests[1].message.as_deref(), Some("family visit"));
        assert_eq!(requests[0].status, LeaveStatus::Pending);
        assert_eq!(requests[0].response_message, None);
        assert_eq!(requests[2].status, LeaveStatus::Denied);
    }

    #[test]
    fn patching_is_idempotent() {
        let mut requests = vec![request("EMP-2", 9, LeaveStatus::Pending)];
        let target = requests[0].uuid;
        patch_decided(&mut requests, target, LeaveStatus::Approved, "ok");
        let snapshot = requests.clone();
        patch_decided(&mut requests, target, LeaveStatus::Approved, "ok");
        assert_eq!(requests, snapshot);
    }

    #[test]
    fn staging_follows_the_decision_rule() {
        let privileged = session("EMP-1", EmployeeType::Privileged);
        let mut lifecycle = lifecycle_with(vec![
            request("EMP-2", 9, LeaveStatus::Pending),
            request("EMP-1", 7, LeaveStatus::Pending),
            request("EMP-3", 4, LeaveStatus::Approved),
        ]);

        let decidable = lifecycle.requests[0].uuid;
        let own = lifecycle.requests[1].uuid;
        let decided = lifecycle.requests[2].uuid;

        lifecycle.stage(&privileged, decidable, Decision::Approve).unwrap();
        assert_eq!(
            lifecycle.staged(),
            Some(StagedDecision {
                uuid: decidable,
                decision: Decision::Approve
            })
        );

        lifecycle.cancel();
        assert_eq!(lifecycle.staged(), None);

        assert!(matches!(
            lifecycle.stage(&privileged, own, Decision::Deny),
            Err(Error::Scope(_))
        ));
        assert!(matches!(
            lifecycle.stage(&privileged, decided, Decision::Approve),
            Err(Error::Scope(_))
        ));

        let standard = session("EMP-4", EmployeeType::Standard);
        assert!(matches!(
            lifecycle.stage(&standard, decidable, Decision::Approve),
            Err(Error::Scope(_))
        ));
    }

    #[tokio::test]
    async fn confirming_without_a_staged_decision_is_a_no_op() {
        let mut lifecycle = lifecycle_with(vec![request("EMP-2", 9, LeaveStatus::Pending)]);
        let session = session("EMP-1", EmployeeType::Privileged);
        lifecycle.confirm(&session, "never staged").await.unwrap();
        assert_eq!(lifecycle.requests()[0].status, LeaveStatus::Pending);
        assert_eq!(lifecycle.requests()[0].response_message, None);
    }

    #[tokio::test]
    async fn confirming_re_checks_scope_on_the_latest_snapshot() {
        let session = session("EMP-1", EmployeeType::Privileged);
        let mut lifecycle = lifecycle_with(vec![request("EMP-2", 9, LeaveStatus::Pending)]);
        let uuid = lifecycle.requests[0].uuid;
        lifecycle.stage(&session, uuid, Decision::Approve).unwrap();

        // Someone else decided it in the meantime and the cache caught up.
        lifecycle.requests[0].status = LeaveStatus::Denied;

        let err = lifecycle.confirm(&session, "too late").await.unwrap_err();
        assert!(matches!(err, Error::Scope(_)));
        // Consumed without remote effect.
        assert_eq!(lifecycle.staged(), None);
        assert_eq!(lifecycle.requests()[0].status, LeaveStatus::Denied);
    }
}
