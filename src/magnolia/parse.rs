use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::node::Node;

/// Decodes a dataset document: either `{ "nodes": [...] }` or a bare array.
///
/// An object without `nodes` decodes to an empty list; rejecting that is the
/// store's job.
pub fn parse_dataset(raw: &str) -> Result<Vec<Node>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in dataset")?;

    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("nodes") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(anyhow!("dataset `nodes` must be an array")),
            None => return Ok(Vec::new()),
        },
        _ => return Err(anyhow!("unexpected JSON type for dataset; expected object or array")),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            serde_json::from_value::<Node>(entry)
                .with_context(|| format!("invalid node record at position {position}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wrapped_and_bare_documents() {
        let wrapped = parse_dataset(r#"{ "version": 2, "nodes": [{ "id": "a" }, { "id": "b" }] }"#)
            .unwrap();
        let bare = parse_dataset(r#"[{ "id": "a" }, { "id": "b" }]"#).unwrap();

        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.len(), 2);
    }

    #[test]
    fn missing_nodes_key_is_empty() {
        assert!(parse_dataset(r#"{ "title": "Magnolia" }"#).unwrap().is_empty());
    }

    #[test]
    fn reports_the_bad_record() {
        let error = parse_dataset(r#"{ "nodes": [{ "id": "a" }, { "label": "no id" }] }"#)
            .unwrap_err();
        assert!(format!("{error:#}").contains("position 1"));
    }

    #[test]
    fn rejects_non_documents() {
        assert!(parse_dataset("42").is_err());
        assert!(parse_dataset(r#"{ "nodes": {} }"#).is_err());
        assert!(parse_dataset("{").is_err());
    }
}
