//! HAL response walking
//!
//! Turns a JSON payload that follows the HAL convention (`_links` for relations,
//! `_embedded` for nested resources) into a [`HalNode`] tree, and flattens that tree
//! into [`OutlineRow`]s for the structured response view.
//!
//! The walk is bounded by [`MAX_DEPTH`]; anything nested deeper is replaced by a
//! truncation marker instead of being recursed into.

use serde_json::{Map, Value};
use std::collections::HashSet;
use url::Url;

/// Maximum number of `_embedded` levels that are walked
pub const MAX_DEPTH: usize = 32;

const LINKS_KEY: &str = "_links";
const EMBEDDED_KEY: &str = "_embedded";

/// A single link relation entry
#[derive(Debug, Clone, PartialEq)]
pub struct HalLink {
    pub rel: String,
    pub href: String,
    pub title: Option<String>,
    pub templated: bool,
}

impl HalLink {
    fn from_descriptor(rel: &str, descriptor: &Value) -> Option<Self> {
        let href = descriptor.get("href")?.as_str()?.to_string();
        Some(Self {
            rel: rel.to_string(),
            href,
            title: descriptor
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string),
            templated: descriptor
                .get("templated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// The request path to GET when this link is followed
    ///
    /// Absolute hrefs are reduced to path and query since the endpoint host is
    /// prepended at send time. Template expressions (`{?start,limit}`) are dropped.
    pub fn target_path(&self) -> String {
        let href = if self.templated {
            strip_template_expressions(&self.href)
        } else {
            self.href.clone()
        };

        match Url::parse(&href) {
            Ok(url) if url.has_host() => match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            },
            _ => href,
        }
    }
}

/// One named group under `_embedded`
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedGroup {
    pub name: String,
    pub items: Vec<HalNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HalNode {
    /// The resource without its `_links` and `_embedded` keys
    pub fields: Value,
    pub links: Vec<HalLink>,
    pub embedded: Vec<EmbeddedGroup>,
    /// Set when the depth limit was hit at this node
    pub truncated: bool,
}

impl HalNode {
    pub fn from_value(value: &Value) -> Self {
        Self::walk(value, 0)
    }

    fn walk(value: &Value, depth: usize) -> Self {
        if depth >= MAX_DEPTH {
            return Self {
                fields: Value::Null,
                links: Vec::new(),
                embedded: Vec::new(),
                truncated: true,
            };
        }

        let Value::Object(object) = value else {
            return Self {
                fields: value.clone(),
                links: Vec::new(),
                embedded: Vec::new(),
                truncated: false,
            };
        };

        let fields: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS_KEY && key.as_str() != EMBEDDED_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let links = object.get(LINKS_KEY).map(parse_links).unwrap_or_default();

        let embedded = match object.get(EMBEDDED_KEY) {
            Some(Value::Object(groups)) => groups
                .iter()
                .map(|(name, items)| EmbeddedGroup {
                    name: name.clone(),
                    items: match items {
                        Value::Array(items) => {
                            items.iter().map(|item| Self::walk(item, depth + 1)).collect()
                        }
                        single => vec![Self::walk(single, depth + 1)],
                    },
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            fields: Value::Object(fields),
            links,
            embedded,
            truncated: false,
        }
    }

    /// Pretty-printed `fields` with two-space indentation
    pub fn fields_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| self.fields.to_string())
    }
}

fn parse_links(value: &Value) -> Vec<HalLink> {
    let Value::Object(relations) = value else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for (rel, descriptor) in relations {
        match descriptor {
            Value::Array(entries) => links.extend(
                entries
                    .iter()
                    .filter_map(|entry| HalLink::from_descriptor(rel, entry)),
            ),
            other => links.extend(HalLink::from_descriptor(rel, other)),
        }
    }
    links
}

fn strip_template_expressions(href: &str) -> String {
    let mut out = String::with_capacity(href.len());
    let mut in_expression = false;
    for c in href.chars() {
        match c {
            '{' => in_expression = true,
            '}' if in_expression => in_expression = false,
            _ if !in_expression => out.push(c),
            _ => {}
        }
    }
    out
}

/// A row of the structured view
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineRow {
    /// One line of a pretty-printed resource
    Json { depth: usize, text: String },
    /// A collapsible section header
    Section {
        id: String,
        depth: usize,
        title: String,
        count: Option<usize>,
        expanded: bool,
    },
    Link { depth: usize, link: HalLink },
    Note { depth: usize, text: String },
}

impl OutlineRow {
    pub fn depth(&self) -> usize {
        match self {
            OutlineRow::Json { depth, .. }
            | OutlineRow::Section { depth, .. }
            | OutlineRow::Link { depth, .. }
            | OutlineRow::Note { depth, .. } => *depth,
        }
    }
}

/// Flatten a node into rows, opening only the sections whose ids are in `expanded`
pub fn build_outline(node: &HalNode, expanded: &HashSet<String>) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    push_node(node, "", 0, expanded, &mut rows);
    rows
}

fn push_node(
    node: &HalNode,
    prefix: &str,
    depth: usize,
    expanded: &HashSet<String>,
    rows: &mut Vec<OutlineRow>,
) {
    if node.truncated {
        rows.push(OutlineRow::Note {
            depth,
            text: format!("Nested deeper than {MAX_DEPTH} levels, not shown"),
        });
        return;
    }

    for line in node.fields_json().lines() {
        rows.push(OutlineRow::Json {
            depth,
            text: line.to_string(),
        });
    }

    let links_id = section_id(prefix, "links");
    let links_open = expanded.contains(&links_id);
    rows.push(OutlineRow::Section {
        id: links_id,
        depth,
        title: "Links".to_string(),
        count: Some(node.links.len()),
        expanded: links_open,
    });
    if links_open {
        if node.links.is_empty() {
            rows.push(OutlineRow::Note {
                depth: depth + 1,
                text: "No links".to_string(),
            });
        }
        for link in &node.links {
            rows.push(OutlineRow::Link {
                depth: depth + 1,
                link: link.clone(),
            });
        }
    }

    for group in &node.embedded {
        let group_id = section_id(prefix, &format!("embedded:{}", group.name));
        let group_open = expanded.contains(&group_id);
        rows.push(OutlineRow::Section {
            id: group_id.clone(),
            depth,
            title: format!("Embedded - {}", group.name),
            count: Some(group.items.len()),
            expanded: group_open,
        });
        if !group_open {
            continue;
        }

        for (idx, item) in group.items.iter().enumerate() {
            let item_id = format!("{group_id}/{idx}");
            let item_open = expanded.contains(&item_id);
            rows.push(OutlineRow::Section {
                id: item_id.clone(),
                depth: depth + 1,
                title: idx.to_string(),
                count: None,
                expanded: item_open,
            });
            if item_open {
                push_node(item, &item_id, depth + 2, expanded, rows);
            }
        }
    }
}

fn section_id(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
