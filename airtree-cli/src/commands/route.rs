//! Route commands - add and list Left/Right routes

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::{parse_direction, resolve_airport};
use crate::client::{DaemonClient, RouteRecord};
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay, TableOutput};

/// Routes as returned by the daemon.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RouteList(pub Vec<RouteRecord>);

impl TableDisplay for RouteList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .0
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    TableOutput::cell(&r.parent_name, 30, config),
                    r.position.label().to_string(),
                    TableOutput::cell(&r.child_name, 30, config),
                    r.duration.to_string(),
                ]
            })
            .collect();
        TableOutput::from_rows(
            &["ID", "Parent", "Position", "Child", "Duration (min)"],
            &rows,
            &[0, 4],
            config,
        )
    }
}

/// Newly created route.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreatedRoute(pub RouteRecord);

impl TableDisplay for CreatedRoute {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} Route {} ({}, {} min) created (id {})",
            "SUCCESS:".green().bold(),
            self.0.label.cyan(),
            self.0.position.label(),
            self.0.duration,
            self.0.id
        )
    }
}

pub async fn run_add(
    client: &DaemonClient,
    parent: &str,
    child: &str,
    position: &str,
    duration: i64,
    format: OutputFormat,
) -> Result<()> {
    let position = parse_direction(position)?;
    let parent = resolve_airport(client, parent).await?;
    let child = resolve_airport(client, child).await?;
    let route = client.create_route(parent, child, position, duration).await?;
    Output::new(CreatedRoute(route), format).render()
}

pub async fn run_list(
    client: &DaemonClient,
    recent: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let routes = client.list_routes(recent).await?;
    Output::new(RouteList(routes), format).render()
}
