use crate::config::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color, Table as ComfyTable};
use sqlpad_core::TableData;

pub fn print_result(result: &TableData, format: OutputFormat, max_rows: usize) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_table(result, max_rows));
            if result.num_rows() > max_rows {
                println!(
                    "{}",
                    format!("... {} more rows", result.num_rows() - max_rows).bright_black()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => print!("{}", render_csv(result)),
    }
    Ok(())
}

pub fn render_table(result: &TableData, max_rows: usize) -> ComfyTable {
    let mut table = ComfyTable::new();
    table.set_header(
        result
            .headers()
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    for row in result.rows().iter().take(max_rows) {
        table.add_row(row.clone());
    }
    table
}

/// Plain comma-joined lines, the same shape the loader reads.
pub fn render_csv(result: &TableData) -> String {
    let mut out = result.headers().join(",");
    out.push('\n');
    for row in result.rows() {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
