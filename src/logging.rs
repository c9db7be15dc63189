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
use std::fs::File;

use anyhow::Context as _;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Installs the global tracing subscriber for a host application.
///
/// The filter comes from `HEATSEEK_LOG` when set, falling back to `info`
/// scoped to this crate. When `HEATSEEK_LOG_FILE` is set, an ANSI-free copy
/// of the output also goes to that file.
pub fn init_tracing() -> anyhow::Result<()> {
    let crate_name = env!("CARGO_CRATE_NAME");
    let filter = EnvFilter::new(
        std::env::var("HEATSEEK_LOG").unwrap_or_else(|_| format!("{crate_name}=info")),
    );

    let registry = Registry::default()
        .with(filter)
        .with(fmt::layer().pretty().with_writer(std::io::stdout));

    if let Ok(path) = std::env::var("HEATSEEK_LOG_FILE") {
        let subscriber = registry.with(
            fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(File::create(&path).context("Failed to create log file")?),
        );
        tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    } else {
        tracing::subscriber::set_global_default(registry).context("Failed to set subscriber")?;
    }

    Ok(())
}
