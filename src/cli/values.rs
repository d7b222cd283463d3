//! List chart values, including the values of every resolved sub-chart.
//!
//! Text output prints one aligned table per chart:
//!
//! ```text
//! app 1.0.0 (charts/app)
//! KEY         TYPE  DEFAULT  DESCRIPTION
//! replicas    int   1        Number of pods
//! redis.port  int   6379     Redis port
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;

use super::common::{ChartArgs, Workspace};
use crate::dependency::SkippedDependency;
use crate::values::{ValueRow, flatten};

/// List every chart's values, sub-chart values included.
#[derive(Args, Debug)]
pub struct ValuesCommand {
    #[command(flatten)]
    charts: ChartArgs,

    /// Output format: text, json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

#[derive(Debug)]
struct ChartValues {
    name: String,
    version: String,
    directory: String,
    rows: Vec<ValueRow>,
    skipped: Vec<SkippedDependency>,
}

impl ValuesCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        self.validate_arguments()?;

        let mut workspace = Workspace::load(&self.charts, config_path, None).await?;
        if workspace.charts.is_empty() {
            if self.format == "json" {
                println!("[]");
            } else {
                println!("No charts found under {}.", self.charts.chart_search_root.display());
            }
            return Ok(());
        }

        let resolved = workspace.resolve_each(|root, resolution| {
            Ok(ChartValues {
                name: root.name().to_string(),
                version: root.metadata.version.clone(),
                directory: root.directory().display().to_string(),
                rows: flatten(&root, &resolution.values),
                skipped: resolution.skipped,
            })
        });

        match self.format.as_str() {
            "json" => println!("{}", render_json(&resolved.reports)?),
            _ => print!("{}", render_text(&resolved.reports)),
        }

        resolved.finish()
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid format '{}'. Valid formats are: text, json",
                self.format
            )),
        }
    }
}

fn render_text(charts: &[ChartValues]) -> String {
    let mut out = String::new();

    for (i, chart) in charts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} {} ({})",
            chart.name.cyan().bold(),
            chart.version.bright_black(),
            chart.directory.bright_black()
        );

        if chart.rows.is_empty() {
            let _ = writeln!(out, "{}", "No values.".bright_black());
        } else {
            render_table(&mut out, &chart.rows);
        }

        for skipped in &chart.skipped {
            let _ = writeln!(out, "{} {}", "⚠️  skipped".yellow(), skipped);
        }
    }

    out
}

fn render_table(out: &mut String, rows: &[ValueRow]) {
    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max("KEY".len());
    let type_width = rows.iter().map(|r| r.value_type.len()).max().unwrap_or(0).max("TYPE".len());
    let default_width = rows.iter().map(|r| r.default.len()).max().unwrap_or(0).max("DEFAULT".len());

    let header = format!(
        "{:<key_width$}  {:<type_width$}  {:<default_width$}  DESCRIPTION",
        "KEY", "TYPE", "DEFAULT"
    );
    let _ = writeln!(out, "{}", header.bold());

    for row in rows {
        let line = format!(
            "{:<key_width$}  {:<type_width$}  {:<default_width$}  {}",
            row.key, row.value_type, row.default, row.description
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn render_json(charts: &[ChartValues]) -> Result<String> {
    let json: Vec<serde_json::Value> = charts
        .iter()
        .map(|chart| {
            serde_json::json!({
                "chart": chart.name,
                "version": chart.version,
                "directory": chart.directory,
                "values": chart.rows,
                "skipped": chart.skipped,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json)?)
}
