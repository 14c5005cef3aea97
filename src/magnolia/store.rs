use std::collections::HashMap;

use log::debug;

use super::error::MagnoliaError;
use super::node::Node;

/// Id-indexed, immutable view of one loaded dataset.
///
/// A repeated id replaces the earlier record's content but keeps the position
/// of its first occurrence, so `all()` stays in first-seen order and holds one
/// record per id.
#[derive(Clone, Debug)]
pub struct NodeStore {
    nodes: Vec<Node>,
    index_by_id: HashMap<String, usize>,
}

impl NodeStore {
    pub fn build(records: Vec<Node>) -> Result<Self, MagnoliaError> {
        if records.is_empty() {
            return Err(MagnoliaError::EmptyDataset);
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(records.len());
        let mut index_by_id = HashMap::with_capacity(records.len());

        for record in records {
            if let Some(&index) = index_by_id.get(&record.id) {
                debug!("event=duplicate_id id={} action=overwrite", record.id);
                nodes[index] = record;
            } else {
                index_by_id.insert(record.id.clone(), nodes.len());
                nodes.push(record);
            }
        }

        Ok(Self { nodes, index_by_id })
    }

    pub fn lookup(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn all(&self) -> &[Node] {
        &self.nodes
    }

    /// Never `None`: construction rejects empty datasets.
    pub fn first(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolved children of `node` in declared order; unknown ids are dropped.
    pub fn resolve_children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = usize> + 'a {
        node.children.iter().filter_map(move |child_id| {
            let resolved = self.index_of(child_id);
            if resolved.is_none() {
                debug!(
                    "event=unresolved_reference kind=child from={} to={child_id}",
                    node.id
                );
            }
            resolved
        })
    }

    /// Number of `children` and `corresponds_to` references pointing nowhere.
    pub fn dangling_reference_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|node| node.children.iter().chain(&node.relations.corresponds_to))
            .filter(|id| !self.contains(id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dataset_is_rejected() {
        assert_eq!(
            NodeStore::build(Vec::new()).unwrap_err(),
            MagnoliaError::EmptyDataset
        );
    }

    #[test]
    fn lookup_and_order() {
        let store = NodeStore::build(vec![Node::new("b"), Node::new("a"), Node::new("c")]).unwrap();
        let ids = store.all().iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(store.lookup("a").map(|n| n.id.as_str()), Some("a"));
        assert!(store.lookup("zzz").is_none());
        assert_eq!(store.first().id, "b");
    }

    #[test]
    fn duplicate_ids_last_write_wins_at_first_position() {
        let store = NodeStore::build(vec![
            Node::new("a").with_label("old"),
            Node::new("b"),
            Node::new("a").with_label("new"),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].label.as_deref(), Some("new"));
        assert_eq!(store.lookup("a").and_then(|n| n.label.as_deref()), Some("new"));
    }

    #[test]
    fn dangling_references_are_counted_not_fatal() {
        let store = NodeStore::build(vec![
            Node::new("root")
                .with_children(["a", "ghost"])
                .with_correspondences(["phantom"]),
            Node::new("a"),
        ])
        .unwrap();

        let root = store.lookup("root").unwrap();
        let children = store.resolve_children(root).collect::<Vec<_>>();
        assert_eq!(children, vec![1]);
        assert_eq!(store.dangling_reference_count(), 2);
    }
}
