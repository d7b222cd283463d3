//! Display resolved sub-chart dependencies.
//!
//! # Output Formats
//!
//! ## Tree (default)
//!
//! ```text
//! app 1.0.0 (charts/app)
//! ├── backend  backend  charts/backend
//! │   └── backend.db  postgresql  charts/backend/charts/postgresql
//! └── redis  redis  /tmp/helmdoc-redis-a1b2c3/redis
//!
//! ⚠️  Skipped 1 dependency:
//!   metrics (declared in charts/app): remote dependency without local archive charts/app/charts/metrics-1.0.0.tgz
//! ```
//!
//! ## Text
//!
//! One line per resolved prefix, indented by depth.
//!
//! ## JSON
//!
//! An array with one object per chart, each holding a nested `dependencies`
//! tree and a flat `skipped` list.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;

use super::common::{ChartArgs, Workspace};
use crate::chart::ChartInfo;
use crate::dependency::{CyclePolicy, DependencyValues, Resolution};

/// Show every chart's sub-chart dependency tree.
#[derive(Args, Debug)]
pub struct DepsCommand {
    #[command(flatten)]
    charts: ChartArgs,

    /// Output format: tree, json, text
    #[arg(short = 'f', long, default_value = "tree")]
    format: String,

    /// What to do about circular dependencies: error, skip
    #[arg(long, value_name = "POLICY")]
    on_cycle: Option<CyclePolicy>,
}

impl DepsCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        self.validate_arguments()?;

        let mut workspace = Workspace::load(&self.charts, config_path, self.on_cycle).await?;
        if workspace.charts.is_empty() {
            if self.format == "json" {
                println!("[]");
            } else {
                println!("No charts found under {}.", self.charts.chart_search_root.display());
            }
            return Ok(());
        }

        let resolved = workspace.resolve_each(|root, resolution| {
            let report = ChartReport::new(&root, &resolution);
            // Scratch directories are no longer needed once the report is built.
            resolution.scratch.close()?;
            Ok(report)
        });

        match self.format.as_str() {
            "json" => println!("{}", render_json(&resolved.reports)?),
            "text" => print!("{}", render_text(&resolved.reports)),
            _ => print!("{}", render_tree(&resolved.reports)),
        }

        resolved.finish()
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "tree" | "json" | "text" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid format '{}'. Valid formats are: tree, json, text",
                self.format
            )),
        }
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    namespace: String,
    prefix: String,
    chart_name: String,
    directory: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.namespace,
            "prefix": self.prefix,
            "chart": self.chart_name,
            "directory": self.directory,
            "dependencies": self.children.iter().map(Self::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Resolution of one chart, detached from its scratch directories.
#[derive(Debug)]
struct ChartReport {
    name: String,
    version: String,
    directory: String,
    dependencies: Vec<TreeNode>,
    flat: Vec<(usize, String, String)>,
    skipped: Vec<crate::dependency::SkippedDependency>,
}

impl ChartReport {
    fn new(root: &ChartInfo, resolution: &Resolution) -> Self {
        Self {
            name: root.name().to_string(),
            version: root.metadata.version.clone(),
            directory: root.directory().display().to_string(),
            dependencies: build_tree(&resolution.values),
            flat: resolution
                .values
                .iter()
                .map(|v| (v.depth, v.prefix.clone(), v.chart_directory.display().to_string()))
                .collect(),
            skipped: resolution.skipped.clone(),
        }
    }
}

/// Rebuild the nested tree from the resolver's pre-order, depth-tagged list.
fn build_tree(values: &[DependencyValues]) -> Vec<TreeNode> {
    fn attach(node: TreeNode, stack: &mut [TreeNode], roots: &mut Vec<TreeNode>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    let mut roots = Vec::new();
    let mut stack: Vec<TreeNode> = Vec::new();

    for value in values {
        while stack.len() > value.depth {
            if let Some(node) = stack.pop() {
                attach(node, &mut stack, &mut roots);
            }
        }
        stack.push(TreeNode {
            namespace: value.prefix.rsplit('.').next().unwrap_or(&value.prefix).to_string(),
            prefix: value.prefix.clone(),
            chart_name: value.chart_name.clone(),
            directory: value.chart_directory.display().to_string(),
            children: Vec::new(),
        });
    }
    while let Some(node) = stack.pop() {
        attach(node, &mut stack, &mut roots);
    }

    roots
}

fn render_tree(reports: &[ChartReport]) -> String {
    let mut out = String::new();

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} {} ({})",
            report.name.cyan().bold(),
            report.version.bright_black(),
            report.directory.bright_black()
        );

        if report.dependencies.is_empty() {
            let _ = writeln!(out, "{}", "└── (no dependencies)".bright_black());
        }
        for (j, node) in report.dependencies.iter().enumerate() {
            let is_last = j == report.dependencies.len() - 1;
            render_node(&mut out, node, "", is_last);
        }

        render_skipped(&mut out, report);
    }

    out
}

fn render_node(out: &mut String, node: &TreeNode, indent: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let _ = writeln!(
        out,
        "{}{}{}  {}  {}",
        indent,
        connector,
        node.prefix.green(),
        node.chart_name,
        node.directory.bright_black()
    );

    let child_indent = if is_last { format!("{indent}    ") } else { format!("{indent}│   ") };
    for (i, child) in node.children.iter().enumerate() {
        render_node(out, child, &child_indent, i == node.children.len() - 1);
    }
}

fn render_skipped(out: &mut String, report: &ChartReport) {
    if report.skipped.is_empty() {
        return;
    }
    let noun = if report.skipped.len() == 1 { "dependency" } else { "dependencies" };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        format!("⚠️  Skipped {} {}:", report.skipped.len(), noun).yellow()
    );
    for skipped in &report.skipped {
        let _ = writeln!(out, "  {skipped}");
    }
}

fn render_text(reports: &[ChartReport]) -> String {
    let mut out = String::new();

    for report in reports {
        let _ = writeln!(out, "{} {} ({})", report.name, report.version, report.directory);
        for (depth, prefix, directory) in &report.flat {
            let _ = writeln!(out, "{}{} {}", "  ".repeat(depth + 1), prefix, directory);
        }
        for skipped in &report.skipped {
            let _ = writeln!(out, "  skipped: {skipped}");
        }
    }

    out
}

fn render_json(reports: &[ChartReport]) -> Result<String> {
    let json: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            serde_json::json!({
                "chart": report.name,
                "version": report.version,
                "directory": report.directory,
                "dependencies": report.dependencies.iter().map(TreeNode::to_json).collect::<Vec<_>>(),
                "skipped": report.skipped,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json)?)
}
