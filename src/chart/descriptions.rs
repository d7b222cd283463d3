//! Value description extraction from values file comments.
//!
//! Descriptions are written as YAML comments next to the values they document.
//! Two forms are recognised:
//!
//! ```yaml
//! # -- Number of replicas to run
//! replicaCount: 1
//!
//! image:
//!   # -- (string) Image repository
//!   # Continuation lines are appended.
//!   # @default -- the chart's appVersion
//!   tag: ""
//!
//! # ingress.hosts -- Hosts served by the ingress
//! ```
//!
//! The first form describes the key on the next line; its dotted path is
//! computed from indentation. The second form names the path explicitly and
//! may appear anywhere. Keys nested under sequence items have no stable path
//! and only get descriptions through the explicit form.

use regex::Regex;
use std::sync::LazyLock;

use super::{ValueDescription, ValueDescriptions};

static AUTO_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*--\s?(.*)$").expect("valid regex"));

static EXPLICIT_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*([A-Za-z0-9_][^\s]*)\s+--\s?(.*)$").expect("valid regex")
});

static DEFAULT_OVERRIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*@default\s+--\s?(.*)$").expect("valid regex"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s?(.*)$").expect("valid regex"));

static TYPE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([^)]*)\)\s*(.*)$").expect("valid regex"));

static MAPPING_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)("[^"]*"|'[^']*'|[^\s#:'"\-][^:#]*?)\s*:(?:\s|$)"#).expect("valid regex")
});

static SEQUENCE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-(?:\s|$)").expect("valid regex"));

/// A description block collected from consecutive comment lines.
#[derive(Debug)]
struct PendingDescription {
    /// Explicit target path, `None` for blocks describing the next key.
    path: Option<String>,
    description: ValueDescription,
}

impl PendingDescription {
    fn new(path: Option<String>, text: &str) -> Self {
        let (value_type, text) = match TYPE_ANNOTATION.captures(text) {
            Some(caps) => (Some(caps[1].trim().to_string()), caps[2].to_string()),
            None => (None, text.to_string()),
        };

        Self {
            path,
            description: ValueDescription {
                description: text.trim().to_string(),
                default: None,
                value_type,
            },
        }
    }

    fn append(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if !self.description.description.is_empty() {
            self.description.description.push(' ');
        }
        self.description.description.push_str(line);
    }
}

/// Extracts value descriptions from the raw text of a values file.
///
/// When the same path is described more than once the last description wins.
#[must_use]
pub fn parse_value_descriptions(content: &str) -> ValueDescriptions {
    let mut descriptions = ValueDescriptions::new();
    let mut key_stack: Vec<(usize, String)> = Vec::new();
    let mut pending: Option<PendingDescription> = None;
    // Indentation of the innermost sequence whose items are being skipped
    let mut sequence_floor: Option<usize> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            if let Some(caps) = DEFAULT_OVERRIDE.captures(line) {
                if let Some(block) = pending.as_mut() {
                    block.description.default = Some(caps[1].trim().to_string());
                }
            } else if let Some(caps) = AUTO_DESCRIPTION.captures(line) {
                commit_explicit(&mut pending, &mut descriptions);
                pending = Some(PendingDescription::new(None, &caps[1]));
            } else if let Some(caps) = EXPLICIT_DESCRIPTION.captures(line) {
                commit_explicit(&mut pending, &mut descriptions);
                pending = Some(PendingDescription::new(Some(caps[1].to_string()), &caps[2]));
            } else if let Some(block) = pending.as_mut()
                && let Some(caps) = COMMENT.captures(line)
            {
                block.append(&caps[1]);
            }
            continue;
        }

        if trimmed.is_empty() {
            commit_explicit(&mut pending, &mut descriptions);
            pending = None;
            continue;
        }

        let indent = line.len() - trimmed.len();

        if let Some(floor) = sequence_floor {
            if indent > floor {
                commit_explicit(&mut pending, &mut descriptions);
                pending = None;
                continue;
            }
            sequence_floor = None;
        }

        if SEQUENCE_ITEM.is_match(line) {
            commit_explicit(&mut pending, &mut descriptions);
            pending = None;
            sequence_floor = Some(indent);
            continue;
        }

        let Some(caps) = MAPPING_KEY.captures(line) else {
            commit_explicit(&mut pending, &mut descriptions);
            pending = None;
            continue;
        };

        let key = unquote(&caps[2]);
        while key_stack.last().is_some_and(|(level, _)| *level >= indent) {
            key_stack.pop();
        }

        let path = key_stack
            .iter()
            .map(|(_, segment)| segment.as_str())
            .chain(std::iter::once(key.as_str()))
            .collect::<Vec<_>>()
            .join(".");

        if let Some(block) = pending.take() {
            let target = block.path.unwrap_or_else(|| path.clone());
            descriptions.insert(target, block.description);
        }

        key_stack.push((indent, key));
    }

    commit_explicit(&mut pending, &mut descriptions);
    descriptions
}

/// Stores a pending explicit-path block; auto blocks need a key line and are left alone.
fn commit_explicit(pending: &mut Option<PendingDescription>, descriptions: &mut ValueDescriptions) {
    if pending.as_ref().is_some_and(|block| block.path.is_some())
        && let Some(PendingDescription {
            path: Some(path),
            description,
        }) = pending.take()
    {
        descriptions.insert(path, description);
    }
}

fn unquote(key: &str) -> String {
    let key = key.trim();
    let quoted = key.len() >= 2
        && ((key.starts_with('"') && key.ends_with('"'))
            || (key.starts_with('\'') && key.ends_with('\'')));
    if quoted {
        key[1..key.len() - 1].to_string()
    } else {
        key.to_string()
    }
}
