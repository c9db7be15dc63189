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
use std::path::PathBuf;

use crate::error::Error;

/// Where the durable session lands when `HEATSEEK_SESSION_DIR` is unset.
pub const DEFAULT_SESSION_DIR: &str = ".heatseek";

/// Environment-driven settings for a host application.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote service, e.g. `http://localhost:8000`.
    pub api_root: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from the process environment, loading a
    /// `.env` file first if one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let api_root = std::env::var("API_ROOT_URL").map_err(|_| Error::Config("API_ROOT_URL"))?;
        let session_dir = std::env::var("HEATSEEK_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR));

        Ok(Self {
            api_root,
            session_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_url_is_a_config_error() {
        std::env::remove_var("API_ROOT_URL");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::Config("API_ROOT_URL")));
    }
}
