use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::parse::parse_dataset;
use super::store::NodeStore;

/// Reads and indexes a dataset file. This is the only place the crate touches
/// the filesystem.
pub fn load_dataset(path: &Path) -> Result<NodeStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;

    let records = parse_dataset(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;

    let store = NodeStore::build(records)
        .with_context(|| format!("{} has no usable nodes", path.display()))?;

    info!(
        "event=dataset_loaded path={} nodes={}",
        path.display(),
        store.len()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::magnolia::error::MagnoliaError;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_seed_shaped_file() {
        let file = write_temp(
            r#"{ "nodes": [
                { "id": "magnolia", "label": "Magnolia", "children": ["a"] },
                { "id": "a", "name": "Alpha" }
            ] }"#,
        );
        let store = load_dataset(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("a").map(|n| n.title()), Some("Alpha"));
    }

    #[test]
    fn empty_dataset_keeps_its_error_kind() {
        let file = write_temp(r#"{ "nodes": [] }"#);
        let error = load_dataset(file.path()).unwrap_err();
        assert_eq!(
            error.downcast_ref::<MagnoliaError>(),
            Some(&MagnoliaError::EmptyDataset)
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("magnolia_seed.json");
        let error = load_dataset(&path).unwrap_err();
        assert!(error.to_string().contains("magnolia_seed.json"));
    }
}
