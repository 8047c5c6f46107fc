//! airtree CLI - command-line client for the airtree daemon
//!
//! Creates airports and Left/Right routes, walks a direction to its last
//! reachable airport, and reports the longest and shortest routes.

use airtree_core::Extremum;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod client;
mod commands;
mod output;

use client::{DaemonClient, DEFAULT_SERVER};
use commands::*;
use output::{ErrorMessage, Output, OutputConfig, OutputFormat};

/// Manage airports and Left/Right routes on an airtree daemon.
#[derive(Parser)]
#[command(name = "airtree")]
#[command(author, version)]
#[command(about = "Manage airports and Left/Right routes on an airtree daemon")]
#[command(propagate_version = true)]
#[command(after_help = "Quick Start:
  airtree airport add JFK           Create an airport
  airtree route add JFK LAX L 330   Route JFK -> LAX on the Left, 330 minutes
  airtree traverse JFK L            Follow Left routes to the end
  airtree longest                   Route with the longest duration")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Daemon base URL
    #[arg(long, global = true, env = "AIRTREE_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors (command results are still printed)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, inspect, and delete airports
    #[command(visible_alias = "a")]
    Airport {
        #[command(subcommand)]
        action: AirportCommand,
    },

    /// Create and list routes
    #[command(visible_alias = "r")]
    Route {
        #[command(subcommand)]
        action: RouteCommand,
    },

    /// Follow routes in one direction until no further route exists
    #[command(visible_alias = "t")]
    Traverse {
        /// Starting airport (id or exact name)
        airport: String,

        /// Direction to follow: L/R or left/right
        direction: String,
    },

    /// Show the route with the longest duration
    Longest,

    /// Show the route with the shortest duration
    Shortest,

    /// Show daemon status
    #[command(visible_alias = "st")]
    Status,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: completions::Shell,

        /// Show installation instructions instead of generating completions
        #[arg(long)]
        instructions: bool,
    },
}

#[derive(Subcommand)]
enum AirportCommand {
    /// Create an airport
    Add {
        /// Unique airport name
        name: String,
    },

    /// List airports in name order
    #[command(visible_alias = "ls")]
    List {
        /// Only airports whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one airport
    Show {
        /// Airport id or exact name
        airport: String,
    },

    /// Delete an airport and every route touching it
    #[command(visible_alias = "delete")]
    Rm {
        /// Airport id or exact name
        airport: String,
    },
}

#[derive(Subcommand)]
enum RouteCommand {
    /// Create a route from a parent airport to a child airport
    Add {
        /// Parent airport (id or exact name)
        parent: String,

        /// Child airport (id or exact name)
        child: String,

        /// Position under the parent: L/R or left/right
        position: String,

        /// Duration in minutes
        #[arg(allow_negative_numbers = true)]
        duration: i64,
    },

    /// List routes by parent name and position
    #[command(visible_alias = "ls")]
    List {
        /// Only the N most recently created routes, newest first
        #[arg(long)]
        recent: Option<usize>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

async fn dispatch(
    command: Commands,
    client: &DaemonClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Airport { action } => match action {
            AirportCommand::Add { name } => airport::run_add(client, &name, format).await,
            AirportCommand::List { search } => {
                airport::run_list(client, search.as_deref(), format).await
            }
            AirportCommand::Show { airport } => airport::run_show(client, &airport, format).await,
            AirportCommand::Rm { airport } => airport::run_rm(client, &airport, format).await,
        },
        Commands::Route { action } => match action {
            RouteCommand::Add {
                parent,
                child,
                position,
                duration,
            } => route::run_add(client, &parent, &child, &position, duration, format).await,
            RouteCommand::List { recent } => route::run_list(client, recent, format).await,
        },
        Commands::Traverse { airport, direction } => {
            query::run_traverse(client, &airport, &direction, format).await
        }
        Commands::Longest => query::run_extremal(client, Extremum::Max, format).await,
        Commands::Shortest => query::run_extremal(client, Extremum::Min, format).await,
        Commands::Status => status::run(client, format).await,
        Commands::Completions {
            shell,
            instructions,
        } => completions::run(shell, instructions, &mut Cli::command(), format),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let format = cli.format;
    if !OutputConfig::auto_detect(format).use_colors() {
        colored::control::set_override(false);
    }

    // Handle case where no command is provided
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return;
        }
    };

    let client = DaemonClient::new(&cli.server);
    if let Err(e) = dispatch(command, &client, format).await {
        tracing::debug!("Command failed: {:?}", e);
        Output::new(ErrorMessage::new(format!("{:#}", e)), format).render_err();
        std::process::exit(1);
    }
}
