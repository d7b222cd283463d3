//! Flattened view of a chart's values.
//!
//! Turns the root chart's values tree, plus every resolved sub-chart's tree,
//! into one row per leaf key. Sub-chart keys are namespaced by the prefix the
//! resolver assigned them, which is where a user sets them in the root
//! chart's `values.yaml`:
//!
//! ```text
//! replicas                 int     1
//! redis.auth.enabled       bool    true
//! backend.db.port          int     5432
//! ```

use serde::Serialize;
use serde_yaml::Value;

use crate::chart::{ChartInfo, ValueDescriptions};
use crate::dependency::DependencyValues;

/// One documented leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueRow {
    /// Fully qualified dotted key.
    pub key: String,
    /// Declared `(type)` annotation, otherwise inferred from the value.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Compact JSON rendering of the value, or the `@default` override.
    pub default: String,
    /// Description text, empty when undocumented.
    pub description: String,
}

/// Flatten the root chart and its resolved dependencies into rows.
///
/// Root rows come first and are unprefixed; dependency rows follow in
/// resolution order. Mapping keys recurse; sequences, scalars and empty
/// mappings are leaves.
#[must_use]
pub fn flatten(root: &ChartInfo, dependencies: &[DependencyValues]) -> Vec<ValueRow> {
    let mut rows = Vec::new();
    collect(&root.values, "", "", &root.descriptions, &mut rows);

    for dependency in dependencies {
        let prefix = format!("{}.", dependency.prefix);
        collect(&dependency.values, &prefix, "", &dependency.descriptions, &mut rows);
    }

    rows
}

fn collect(
    value: &Value,
    prefix: &str,
    path: &str,
    descriptions: &ValueDescriptions,
    rows: &mut Vec<ValueRow>,
) {
    match value {
        Value::Mapping(map) if !map.is_empty() => {
            for (key, child) in map {
                let Some(key) = key_segment(key) else {
                    continue;
                };
                let child_path =
                    if path.is_empty() { key } else { format!("{path}.{key}") };
                collect(child, prefix, &child_path, descriptions, rows);
            }
        }
        Value::Tagged(tagged) => collect(&tagged.value, prefix, path, descriptions, rows),
        // A null or empty root values file has nothing to document.
        _ if path.is_empty() => {}
        leaf => {
            let documented = descriptions.get(path);
            rows.push(ValueRow {
                key: format!("{prefix}{path}"),
                value_type: documented
                    .and_then(|d| d.value_type.clone())
                    .unwrap_or_else(|| infer_type(leaf).to_string()),
                default: documented
                    .and_then(|d| d.default.clone())
                    .unwrap_or_else(|| render_default(leaf)),
                description: documented.map(|d| d.description.clone()).unwrap_or_default(),
            });
        }
    }
}

fn key_segment(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(tagged) => infer_type(&tagged.value),
    }
}

fn render_default(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
}
