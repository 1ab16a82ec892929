use crate::catalog;
use crate::commands::{execute_query, load_table, show_cache_stats, show_examples, show_tables};
use crate::config::{Config, OutputFormat};
use crate::history::QueryHistory;
use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{Cell, Color, Table as ComfyTable};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sqlpad_executor::QueryExecutor;
use std::path::PathBuf;

pub struct Repl {
    config: Config,
    editor: DefaultEditor,
    executor: QueryExecutor,
    history: QueryHistory,
    history_file: PathBuf,
}

/// What the loop should do after a line is handled.
enum Flow {
    Continue,
    Exit,
}

impl Repl {
    pub fn new(config: Config, executor: QueryExecutor) -> Result<Self> {
        let history_file = Self::get_history_file()?;
        let mut editor = DefaultEditor::new()?;

        let _ = editor.load_history(&history_file);

        Ok(Self {
            config,
            editor,
            executor,
            history: QueryHistory::new(),
            history_file,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "Interactive SQL Playground".bright_green().bold());
        println!("  {}  - Show available commands", ".help".bright_cyan());
        println!("  {} - List predefined queries", ".examples".bright_cyan());
        println!("  {}  - Exit the REPL", ".quit".bright_cyan());
        println!();

        loop {
            let prompt = format!("{} ", "sqlpad>".bright_green().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(line)?;

                    match self.handle_input(line).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Exit) => break,
                        Err(e) => eprintln!("{} {:#}", "Error:".bright_red().bold(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".bright_yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "exit".bright_yellow());
                    break;
                }
                Err(err) => {
                    eprintln!("{} {:?}", "Error:".bright_red().bold(), err);
                    break;
                }
            }
        }

        self.editor.save_history(&self.history_file)?;

        println!("{}", "Goodbye!".bright_cyan());
        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<Flow> {
        if input.starts_with('.') {
            self.handle_command(input).await
        } else {
            self.handle_sql(input).await?;
            Ok(Flow::Continue)
        }
    }

    async fn handle_command(&mut self, cmd: &str) -> Result<Flow> {
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts[0] {
            ".help" | ".h" => self.show_help(),
            ".quit" | ".q" | ".exit" => return Ok(Flow::Exit),
            ".tables" => show_tables(&self.executor),
            ".load" => {
                let table = parts.get(1).context("Usage: .load <table>")?;
                load_table(&self.executor, table).await?;
            }
            ".cache" => show_cache_stats(&self.executor),
            ".clear" => {
                self.executor.clear_cache();
                println!("{} Cache cleared", "✓".bright_green());
            }
            ".history" => self.show_history(),
            ".examples" => show_examples(),
            ".run" => {
                let key = parts.get(1).context("Usage: .run <number|id>")?;
                let query = catalog::find(key)
                    .with_context(|| format!("No predefined query '{}'", key))?;
                println!("{} {}", "→".bright_blue(), query.sql.bright_cyan());
                self.handle_sql(query.sql).await?;
            }
            ".timing" => {
                self.config.show_timing = !self.config.show_timing;
                println!(
                    "Timing is now {}",
                    if self.config.show_timing {
                        "ON".bright_green()
                    } else {
                        "OFF".bright_red()
                    }
                );
            }
            ".format" => match parts.get(1) {
                Some(name) => {
                    self.config.output_format = OutputFormat::parse(name)?;
                    println!("Output format set to: {}", name.bright_cyan());
                }
                None => {
                    println!("Current format: {:?}", self.config.output_format);
                    println!("Usage: .format <table|json|csv>");
                }
            },
            _ => {
                anyhow::bail!(
                    "Unknown command: {}. Type .help for available commands",
                    parts[0]
                );
            }
        }

        Ok(Flow::Continue)
    }

    async fn handle_sql(&mut self, sql: &str) -> Result<()> {
        self.history.record(sql);
        execute_query(&self.executor, &self.config, sql, self.config.output_format).await
    }

    fn show_help(&self) {
        let mut table = ComfyTable::new();
        table.set_header(vec![
            Cell::new("Command").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Yellow),
        ]);

        let commands = vec![
            (".help, .h", "Show this help message"),
            (".quit, .q, .exit", "Exit the REPL"),
            (".tables", "List queryable tables and whether they are cached"),
            (".load <table>", "Load a table and show its columns"),
            (".cache", "Show table cache statistics"),
            (".clear", "Empty the table cache"),
            (".history", "Show queries run in this session"),
            (".examples", "List predefined queries"),
            (".run <n|id>", "Run a predefined query"),
            (".timing", "Toggle query timing display"),
            (".format <type>", "Set output format (table|json|csv)"),
        ];

        for (cmd, desc) in commands {
            table.add_row(vec![cmd, desc]);
        }

        println!("{}", table);
        println!();
        println!("{}", "Supported SQL:".bright_yellow().bold());
        println!("  SELECT <*|col, ...> FROM <table>");
        println!("    [WHERE <col> <op> <value> [AND ...]] [LIMIT <n>]");
        println!();
        println!("{}", "Operators:".bright_yellow().bold());
        println!("  =  !=  >  <  >=  <=  LIKE 'A%e'  IN (a,b,c)");
        println!();
    }

    fn show_history(&self) {
        if self.history.is_empty() {
            println!("{}", "No queries yet".bright_yellow());
            return;
        }

        let mut table = ComfyTable::new();
        table.set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Query").fg(Color::Green),
            Cell::new("Id").fg(Color::Magenta),
        ]);
        for item in self.history.iter() {
            table.add_row(vec![
                item.timestamp.format("%H:%M:%S").to_string(),
                item.query.clone(),
                item.id.to_string(),
            ]);
        }
        println!("{}", table);
    }

    fn get_history_file() -> Result<PathBuf> {
        let home = home::home_dir().context("Could not find home directory")?;
        let history_dir = home.join(".sqlpad");
        std::fs::create_dir_all(&history_dir)?;
        Ok(history_dir.join("history.txt"))
    }
}
