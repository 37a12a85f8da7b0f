//! Projection of nodes to the OSC Query JSON dialect
//!
//! Serialization is a pre-order traversal that carries the full path down,
//! so a snapshot of a node and its descendants is allocation-linear in the
//! subtree size. The omission rules keep write-only methods compact: RANGE,
//! CLIPMODE, and VALUE appear only when at least one per-argument entry is
//! non-null.

use serde_json::{json, Map, Value as Json};

use crate::{value_to_json, Argument, Node};

/// Render the concatenated TYPE string for an argument list
pub fn type_string(args: &[Argument]) -> String {
    let mut out = String::with_capacity(args.len());
    for arg in args {
        arg.arg_type.append_to(&mut out);
    }
    out
}

/// Serialize a node and its descendants, rooted at `full_path`
/// (`"/"` for the root node).
pub fn serialize_node(node: &Node, full_path: &str) -> Json {
    let mut obj = Map::new();
    obj.insert("FULL_PATH".to_string(), json!(full_path));

    if let Some(description) = node.description() {
        obj.insert("DESCRIPTION".to_string(), json!(description));
    }

    match node.access() {
        Some(access) => {
            obj.insert("ACCESS".to_string(), json!(access as u8));
        }
        None if node.is_container() => {
            obj.insert("ACCESS".to_string(), json!(0));
        }
        None => {}
    }

    if let Some(tags) = node.tags() {
        obj.insert("TAGS".to_string(), json!(tags));
    }

    if let Some(critical) = node.critical() {
        obj.insert("CRITICAL".to_string(), json!(critical));
    }

    if node.child_count() > 0 {
        let mut contents = Map::new();
        for (name, child) in node.children() {
            let child_path = if full_path == "/" {
                format!("/{name}")
            } else {
                format!("{full_path}/{name}")
            };
            contents.insert(name.to_string(), serialize_node(child, &child_path));
        }
        obj.insert("CONTENTS".to_string(), Json::Object(contents));
    }

    if let Some(args) = node.arguments() {
        obj.insert("TYPE".to_string(), json!(type_string(args)));

        let ranges: Vec<Json> = args
            .iter()
            .map(|arg| match &arg.range {
                Some(range) if !range.is_empty() => {
                    let mut entry = Map::new();
                    if let Some(min) = &range.min {
                        entry.insert("MIN".to_string(), value_to_json(min));
                    }
                    if let Some(max) = &range.max {
                        entry.insert("MAX".to_string(), value_to_json(max));
                    }
                    if let Some(vals) = &range.vals {
                        entry.insert(
                            "VALS".to_string(),
                            Json::Array(vals.iter().map(value_to_json).collect()),
                        );
                    }
                    Json::Object(entry)
                }
                _ => Json::Null,
            })
            .collect();
        if ranges.iter().any(|entry| !entry.is_null()) {
            obj.insert("RANGE".to_string(), Json::Array(ranges));
        }

        let clip_modes: Vec<Json> = args
            .iter()
            .map(|arg| match arg.clip_mode {
                Some(mode) => json!(mode.as_str()),
                None => Json::Null,
            })
            .collect();
        if clip_modes.iter().any(|entry| !entry.is_null()) {
            obj.insert("CLIPMODE".to_string(), Json::Array(clip_modes));
        }

        if node.access().is_some_and(|access| access.readable()) {
            let values: Vec<Json> = args
                .iter()
                .map(|arg| arg.value.as_ref().map(value_to_json).unwrap_or(Json::Null))
                .collect();
            if values.iter().any(|entry| !entry.is_null()) {
                obj.insert("VALUE".to_string(), Json::Array(values));
            }
        }
    }

    Json::Object(obj)
}
