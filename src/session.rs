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
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::ApiClient;
use crate::error::Error;
use crate::models::Employee;

const TOKEN_KEY: &str = "token";
const EMPLOYEE_KEY: &str = "employee.json";

/// An authenticated subject. Token and profile always travel together;
/// there is no state where only one of them is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub employee: Employee,
}

/// Single owner of the process-wide session.
///
/// The session is persisted under two keys in one directory, mirroring the
/// durable storage contract: a restore only succeeds when both are present
/// and well-formed. Dependents never cache what they read from here; they
/// take a fresh snapshot on every operation.
#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// Opens the store and restores any complete persisted session. A token
    /// without a profile, or the reverse, counts as signed out.
    pub fn restore(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let session = load_session(&dir);
        if let Some(session) = &session {
            info!("Restored session for {}", session.employee.employee_id);
        }
        Self { dir, session }
    }

    /// Stores the session durably, then in memory. A storage failure aborts
    /// this login only and leaves the prior in-memory session untouched.
    pub fn login(&mut self, token: String, employee: Employee) -> Result<(), Error> {
        persist_session(&self.dir, &token, &employee)?;
        info!("Signed in as {}", employee.employee_id);
        self.session = Some(Session { token, employee });
        Ok(())
    }

    /// Clears memory and durable storage unconditionally. Removal failures
    /// are ignored; the in-memory session is gone either way.
    pub fn logout(&mut self) {
        self.session = None;
        let _ = fs::remove_file(self.dir.join(TOKEN_KEY));
        let _ = fs::remove_file(self.dir.join(EMPLOYEE_KEY));
        info!("Signed out");
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The session, or the cue to route back to login.
    pub fn require(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::Auth)
    }
}

/// The full sign-in sequence: exchange credentials for a token, hydrate the
/// profile with that token, then persist both together. On any failure the
/// store is left exactly as it was.
pub async fn sign_in(
    api: &ApiClient,
    store: &mut SessionStore,
    employee_id: &str,
    password: &str,
) -> Result<(), Error> {
    let reply = api.login(employee_id, password).await?;
    let employee = api.fetch_employee(&reply.token, &reply.employee_id).await?;
    store.login(reply.token, employee)
}

fn load_session(dir: &Path) -> Option<Session> {
    let token = fs::read_to_string(dir.join(TOKEN_KEY)).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return None;
    }
    let raw = fs::read(dir.join(EMPLOYEE_KEY)).ok()?;
    let employee = serde_json::from_slice(&raw).ok()?;
    Some(Session { token, employee })
}

fn persist_session(dir: &Path, token: &str, employee: &Employee) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(TOKEN_KEY), token)?;
    fs::write(
        dir.join(EMPLOYEE_KEY),
        serde_json::to_vec(employee).map_err(std::io::Error::from)?,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeType;

    fn employee() -> Employee {
        Employee {
            employee_id: "EMP-2".into(),
            first_name: "Rhea".into(),
            last_name: "Nair".into(),
            employee_type: EmployeeType::Standard,
            available_paid_leaves: 12,
        }
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("heatseek-session-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn login_then_restore_round_trips() {
        let dir = scratch_dir("roundtrip");
        let mut store = SessionStore::restore(&dir);
        assert!(store.current().is_none());

        store.login("tok-1".into(), employee()).unwrap();
        assert_eq!(store.require().unwrap().token, "tok-1");

        let restored = SessionStore::restore(&dir);
        let session = restored.current().unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.employee, employee());
    }

    #[test]
    fn a_token_without_a_profile_is_signed_out() {
        let dir = scratch_dir("token-only");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(TOKEN_KEY), "tok-1").unwrap();

        let store = SessionStore::restore(&dir);
        assert!(store.current().is_none());
    }

    #[test]
    fn a_profile_without_a_token_is_signed_out() {
        let dir = scratch_dir("profile-only");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(EMPLOYEE_KEY),
            serde_json::to_vec(&employee()).unwrap(),
        )
        .unwrap();

        let store = SessionStore::restore(&dir);
        assert!(store.current().is_none());
    }

    #[test]
    fn a_malformed_profile_is_signed_out() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(TOKEN_KEY), "tok-1").unwrap();
        fs::write(dir.join(EMPLOYEE_KEY), b"not json").unwrap();

        let store = SessionStore::restore(&dir);
        assert!(store.current().is_none());
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let dir = scratch_dir("logout");
        let mut store = SessionStore::restore(&dir);
        store.login("tok-1".into(), employee()).unwrap();

        store.logout();
        assert!(store.current().is_none());
        assert!(matches!(store.require(), Err(Error::Auth)));
        assert!(SessionStore::restore(&dir).current().is_none());
    }
}
