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
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response, StatusCode};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Error;
use crate::models::{
    AttendanceStatus, Employee, LeaveRequest, LeaveStatus, LoginReply, Month, MonthlyAttendance,
    Page,
};

/// Typed wrapper over the remote service's HTTP surface.
///
/// Every call except [`ApiClient::login`] carries the session token as a
/// `Authorization: Token ...` header. The service itself is the single
/// authority; nothing here retries or coordinates concurrent writes.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    root: String,
}

impl ApiClient {
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.ends_with('/') {
            root.pop();
        }
        Self {
            http: reqwest::Client::new(),
            root,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_root.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("Token {token}"))
    }

    /// Exchanges credentials for a token. A rejection surfaces the server's
    /// own message when it sends one.
    pub async fn login(&self, employee_id: &str, password: &str) -> Result<LoginReply, Error> {
        let response = self
            .http
            .post(self.url("/api/login/"))
            .json(&json!({ "employee_id": employee_id, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let message = server_message(response)
                .await
                .unwrap_or_else(|| "Login failed".to_string());
            return Err(Error::Validation(message));
        }

        let reply: LoginReply = response.json().await?;
        debug!("Logged in as {}", reply.employee_id);
        Ok(reply)
    }

    /// Hydrates the full profile, used right after login.
    pub async fn fetch_employee(&self, token: &str, employee_id: &str) -> Result<Employee, Error> {
        let response = self
            .authed(Method::GET, &format!("/api/employees/{employee_id}/"), token)
            .send()
            .await?;
        Ok(expect_ok(response).await?.json().await?)
    }

    pub async fn list_employees(&self, token: &str) -> Result<Vec<Employee>, Error> {
        let response = self
            .authed(Method::GET, "/api/employees/", token)
            .send()
            .await?;
        let page: Page<Employee> = expect_ok(response).await?.json().await?;
        Ok(page.results)
    }

    /// One month window of attendance. Privileged actors address the target
    /// employee explicitly; the bare form resolves to the token's owner.
    pub async fn monthly_attendance(
        &self,
        token: &str,
        month: Month,
        employee_id: Option<&str>,
    ) -> Result<MonthlyAttendance, Error> {
        let path = match employee_id {
            Some(id) => format!("/api/attendances/{month}/{id}/"),
            None => format!("/api/attendances/{month}/"),
        };
        let response = self.authed(Method::GET, &path, token).send().await?;
        Ok(expect_ok(response).await?.json().await?)
    }

    pub async fn create_attendance(
        &self,
        token: &str,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<(), Error> {
        debug!("Creating {date} as {status:?} for {employee_id}");
        let response = self
            .authed(Method::POST, "/api/attendances/", token)
            .json(&json!({ "employee_id": employee_id, "date": date, "status": status }))
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    pub async fn update_attendance(
        &self,
        token: &str,
        date: NaiveDate,
        employee_id: &str,
        status: AttendanceStatus,
    ) -> Result<(), Error> {
        debug!("Updating {date} to {status:?} for {employee_id}");
        let response = self
            .authed(
                Method::PATCH,
                &format!("/api/attendances/{date}/{employee_id}/"),
                token,
            )
            .json(&json!({ "status": status }))
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    /// Deleting the record reverts the day to implicit ABSENT.
    pub async fn delete_attendance(
        &self,
        token: &str,
        date: NaiveDate,
        employee_id: &str,
    ) -> Result<(), Error> {
        debug!("Deleting {date} for {employee_id}");
        let response = self
            .authed(
                Method::DELETE,
                &format!("/api/attendances/{date}/{employee_id}/"),
                token,
            )
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    /// Lists leave requests, newest date first. `employee_id` narrows the
    /// list to one requester.
    pub async fn list_leave_requests(
        &self,
        token: &str,
        employee_id: Option<&str>,
    ) -> Result<Vec<LeaveRequest>, Error> {
        let mut request = self
            .authed(Method::GET, "/api/leave-requests/", token)
            .query(&[("ordering", "-date")]);
        if let Some(id) = employee_id {
            request = request.query(&[("employee_id", id)]);
        }
        let response = request.send().await?;
        let page: Page<LeaveRequest> = expect_ok(response).await?.json().await?;
        Ok(page.results)
    }

    pub async fn submit_leave_request(
        &self,
        token: &str,
        employee_id: &str,
        date: NaiveDate,
        message: &str,
    ) -> Result<(), Error> {
        debug!("Submitting leave request for {date} by {employee_id}");
        let response = self
            .authed(Method::POST, "/api/leave-requests/", token)
            .json(&json!({
                "employee_id": employee_id,
                "date": date,
                "message": message,
                "status": LeaveStatus::Pending,
            }))
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    pub async fn approve_leave_request(
        &self,
        token: &str,
        uuid: Uuid,
        response_message: &str,
    ) -> Result<(), Error> {
        self.decide_leave_request(token, uuid, "approve", response_message)
            .await
    }

    pub async fn deny_leave_request(
        &self,
        token: &str,
        uuid: Uuid,
        response_message: &str,
    ) -> Result<(), Error> {
        self.decide_leave_request(token, uuid, "deny", response_message)
            .await
    }

    async fn decide_leave_request(
        &self,
        token: &str,
        uuid: Uuid,
        action: &str,
        response_message: &str,
    ) -> Result<(), Error> {
        debug!("Posting {action} for leave request {uuid}");
        let response = self
            .authed(
                Method::POST,
                &format!("/api/leave-requests/{uuid}/{action}/"),
                token,
            )
            .json(&json!({ "response_message": response_message }))
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }
}

async fn expect_ok(response: Response) -> Result<Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(reject(response).await)
}

/// Maps a non-success response onto the error taxonomy: an invalid token
/// routes back to login, a server-reported message is surfaced verbatim and
/// anything else keeps only its status.
async fn reject(response: Response) -> Error {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Error::Auth;
    }
    match server_message(response).await {
        Some(message) => Error::Validation(message),
        None => Error::Status(status),
    }
}

/// Pulls the `detail` (or `message`) field servers put in error bodies.
async fn server_message(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    debug!("Error response body: {body}");
    body.get("detail")
        .or_else(|| body.get("message"))
        .and_then(|value| value.as_str())
        .map(str::to_string)
}
