//! Query commands - traverse, longest, and shortest

use airtree_core::Extremum;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::{parse_direction, resolve_airport};
use crate::client::{DaemonClient, ExtremalRecord, TraverseRecord};
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay, TableOutput};

/// Traversal result.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TraverseView(pub TraverseRecord);

impl TableDisplay for TraverseView {
    fn to_table(&self, config: &OutputConfig) -> String {
        let walk = &self.0;
        let separator = if config.use_colors() {
            " → ".dimmed().to_string()
        } else {
            " → ".to_string()
        };
        let path = walk
            .path
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(&separator);

        let mut out = format!(
            "{} {} (id {})\n",
            "Last reachable airport:".cyan().bold(),
            walk.last_reachable_airport.green().bold(),
            walk.airport_id
        );
        out.push_str(&format!(
            "  {}: {}\n",
            "Direction".cyan(),
            walk.direction.label()
        ));
        out.push_str(&format!("  {}: {}\n", "Hops".cyan(), walk.hops));
        out.push_str(&format!("  {}: {}", "Path".cyan(), path));
        out
    }
}

/// Longest or shortest route.
#[derive(Debug, Serialize)]
pub struct ExtremalView {
    #[serde(skip)]
    pub kind: Extremum,
    #[serde(flatten)]
    pub record: ExtremalRecord,
}

impl TableDisplay for ExtremalView {
    fn to_table(&self, config: &OutputConfig) -> String {
        let title = match self.kind {
            Extremum::Max => "Longest route",
            Extremum::Min => "Shortest route",
        };
        let table = TableOutput::format_key_value(
            &[
                ("Route", self.record.route.clone()),
                (
                    "Airport",
                    format!("{} (id {})", self.record.airport, self.record.airport_id),
                ),
                ("Duration", format!("{} min", self.record.duration)),
            ],
            config,
        );
        format!("{}\n{}", title.cyan().bold(), table)
    }
}

pub async fn run_traverse(
    client: &DaemonClient,
    airport: &str,
    direction: &str,
    format: OutputFormat,
) -> Result<()> {
    let direction = parse_direction(direction)?;
    let id = resolve_airport(client, airport).await?;
    let walk = client.traverse(id, direction).await?;
    Output::new(TraverseView(walk), format).render()
}

pub async fn run_extremal(
    client: &DaemonClient,
    kind: Extremum,
    format: OutputFormat,
) -> Result<()> {
    let record = client.extremal(kind).await?;
    Output::new(ExtremalView { kind, record }, format).render()
}
