//! Airport commands - add, list, show, and remove airports

use airtree_core::Airport;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::resolve_airport;
use crate::client::{DaemonClient, DeleteRecord};
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay, TableOutput};

/// Airports in name order.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AirportList(pub Vec<Airport>);

impl TableDisplay for AirportList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .0
            .iter()
            .map(|a| vec![a.id.to_string(), a.name.clone()])
            .collect();
        let mut out = TableOutput::from_rows(&["ID", "Name"], &rows, &[0], config);
        if !rows.is_empty() {
            out.push_str(&format!("\n{} airport(s)", rows.len()));
        }
        out
    }
}

/// A single airport.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AirportCard(pub Airport);

impl TableDisplay for AirportCard {
    fn to_table(&self, config: &OutputConfig) -> String {
        TableOutput::format_key_value(
            &[("ID", self.0.id.to_string()), ("Name", self.0.name.clone())],
            config,
        )
    }
}

/// Newly created airport.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreatedAirport(pub Airport);

impl TableDisplay for CreatedAirport {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} Airport {} created (id {})",
            "SUCCESS:".green().bold(),
            self.0.name.cyan(),
            self.0.id
        )
    }
}

/// Outcome of removing an airport and its routes.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RemovedAirport(pub DeleteRecord);

impl TableDisplay for RemovedAirport {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} Deleted airport {} and {} route(s)",
            "SUCCESS:".green().bold(),
            self.0.airport.name.cyan(),
            self.0.removed_routes
        )
    }
}

pub async fn run_add(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    let airport = client.create_airport(name).await?;
    Output::new(CreatedAirport(airport), format).render()
}

pub async fn run_list(
    client: &DaemonClient,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let airports = client.list_airports(search).await?;
    Output::new(AirportList(airports), format).render()
}

pub async fn run_show(client: &DaemonClient, key: &str, format: OutputFormat) -> Result<()> {
    let id = resolve_airport(client, key).await?;
    let airport = client.get_airport(id).await?;
    Output::new(AirportCard(airport), format).render()
}

pub async fn run_rm(client: &DaemonClient, key: &str, format: OutputFormat) -> Result<()> {
    let id = resolve_airport(client, key).await?;
    let removed = client.delete_airport(id).await?;
    Output::new(RemovedAirport(removed), format).render()
}
