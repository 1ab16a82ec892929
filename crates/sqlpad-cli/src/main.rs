use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod commands;
mod config;
mod history;
mod output;
mod repl;

use commands::*;
use config::{Config, OutputFormat};
use repl::Repl;

#[derive(Parser)]
#[command(name = "sqlpad")]
#[command(author, version, about = "SQL playground over CSV tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <table>.csv files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Fetch tables from <base-url>/<table>.csv instead of a directory
    #[arg(short, long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive REPL
    Repl,

    /// Execute a SQL query
    Query {
        /// SQL query to execute
        #[arg(short, long)]
        sql: String,

        /// Output format (table, json, csv)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show queryable tables and predefined queries
    Tables,

    /// Load a table and show its columns
    Load {
        /// Table name
        table: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }

    tracing::debug!(?config, "configuration loaded");
    let executor = build_executor(&config);

    match cli.command {
        Some(Commands::Query { sql, output }) => {
            let format = match output {
                Some(name) => OutputFormat::parse(&name)?,
                None => config.output_format,
            };
            execute_query(&executor, &config, &sql, format).await?;
        }
        Some(Commands::Tables) => {
            show_tables(&executor);
            show_examples();
        }
        Some(Commands::Load { table }) => {
            load_table(&executor, &table).await?;
        }
        Some(Commands::Repl) | None => {
            print_banner();
            let mut repl = Repl::new(config, executor)?;
            repl.run().await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        "sqlpad_cli=debug,sqlpad_executor=debug,sqlpad_storage=debug,sqlpad_cache=debug,sqlpad_parser=debug"
    } else {
        "sqlpad_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        r#"
           _                 _
  ___  __ _| |_ __  __ _  __| |
 / __|/ _` | | '_ \/ _` |/ _` |
 \__ \ (_| | | |_) | (_| | (_| |
 |___/\__, |_| .__/\__,_|\__,_|
         |_| |_|
    "#
        .bright_cyan()
    );
    println!(
        "{}",
        format!("SQL Playground v{}", env!("CARGO_PKG_VERSION")).bright_yellow()
    );
    println!("{}", "Type '.help' for available commands\n".bright_black());
}
