//! Status command - show daemon health and table counts

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::client::{DaemonClient, StatusRecord};
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay, TableOutput};

/// Daemon status together with the address it was reached at.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub server: String,
    #[serde(flatten)]
    pub status: StatusRecord,
}

impl TableDisplay for StatusView {
    fn to_table(&self, config: &OutputConfig) -> String {
        let s = &self.status;
        let table = TableOutput::format_key_value(
            &[
                ("Server", self.server.clone()),
                ("Storage", s.storage.clone()),
                (
                    "Schema",
                    s.schema_version.clone().unwrap_or_else(|| "-".to_string()),
                ),
                ("Airports", s.airport_count.to_string()),
                ("Routes", s.route_count.to_string()),
                ("Started", s.started_at.clone()),
                ("Uptime", format_uptime(s.uptime_seconds)),
            ],
            config,
        );
        format!(
            "{}\n{}",
            format!("airtree daemon: {}", s.status).green().bold(),
            table
        )
    }
}

fn format_uptime(seconds: f64) -> String {
    let total = seconds as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{:.1}s", seconds)
    }
}

pub async fn run(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await?;
    let view = StatusView {
        server: client.base_url().to_string(),
        status,
    };
    Output::new(view, format).render()
}
