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
use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong in this crate.
///
/// `Auth` and `Scope` are raised before any remote call is made. The engines
/// catch `Transport`, `Status` and `Validation` at their operation boundary
/// and keep them as a displayable message instead of propagating them.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable session. The caller should route back to login.
    #[error("authentication required")]
    Auth,

    /// The acting employee may not perform this operation. Never involves
    /// the network.
    #[error("not permitted: {0}")]
    Scope(&'static str),

    /// The request never produced a usable response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server replied with a non-success status and no readable message.
    #[error("server responded with an error: {0}")]
    Status(StatusCode),

    /// A message the server reported explicitly, e.g. a duplicate leave
    /// request or bad credentials.
    #[error("{0}")]
    Validation(String),

    /// Durable session storage failed.
    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// A required variable is missing from the environment.
    #[error("{0} was not found in the ENV")]
    Config(&'static str),
}
