use std::collections::{HashMap, HashSet};

use log::{debug, info};

use super::error::MagnoliaError;
use super::store::NodeStore;

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub id: String,
    /// Position of the backing record in [`NodeStore::all`].
    pub record: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree over the records reachable from the root through `children`.
///
/// Nodes are stored in depth-first pre-order, children in declared order, so
/// index 0 is always the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    index_by_id: HashMap<String, usize>,
    max_depth: usize,
}

impl Tree {
    pub const ROOT: usize = 0;

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// `(parent, child)` index pairs, one per non-root node, in pre-order.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(index, _)| index)
    }

    /// Whether `a` and `b` hang off the same parent. The root has no siblings.
    pub fn are_siblings(&self, a: usize, b: usize) -> bool {
        match (self.nodes[a].parent, self.nodes[b].parent) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        }
    }
}

/// One record on the current depth-first path, with its resolved children
/// and how many of them have been visited.
struct Frame {
    index: usize,
    record: usize,
    children: Vec<usize>,
    next_child: usize,
}

struct Builder<'a> {
    store: &'a NodeStore,
    nodes: Vec<TreeNode>,
    placed: HashSet<usize>,
    on_path: HashSet<usize>,
    stack: Vec<Frame>,
}

impl Builder<'_> {
    fn enter(&mut self, record: usize, parent: Option<usize>, depth: usize) -> usize {
        let store = self.store;
        let node = &store.all()[record];
        let index = self.nodes.len();
        self.nodes.push(TreeNode {
            id: node.id.clone(),
            record,
            parent,
            children: Vec::new(),
            depth,
        });
        self.placed.insert(record);
        self.on_path.insert(record);
        self.stack.push(Frame {
            index,
            record,
            children: store.resolve_children(node).collect(),
            next_child: 0,
        });
        index
    }

    /// Depth-first walk with an explicit stack, so deep chains cannot
    /// exhaust the call stack. Nodes are numbered in pre-order.
    fn walk(&mut self, root_record: usize) -> Result<(), MagnoliaError> {
        let store = self.store;
        self.enter(root_record, None, 0);

        while let Some(frame) = self.stack.last_mut() {
            let Some(&child) = frame.children.get(frame.next_child) else {
                let record = frame.record;
                self.stack.pop();
                self.on_path.remove(&record);
                continue;
            };
            frame.next_child += 1;
            let parent = frame.index;
            let parent_record = frame.record;

            if self.on_path.contains(&child) {
                return Err(MagnoliaError::CyclicHierarchy {
                    id: store.all()[child].id.clone(),
                });
            }
            if self.placed.contains(&child) {
                debug!(
                    "event=reparent_skipped child={} parent={}",
                    store.all()[child].id,
                    store.all()[parent_record].id
                );
                continue;
            }

            let depth = self.nodes[parent].depth + 1;
            let child_index = self.enter(child, Some(parent), depth);
            self.nodes[parent].children.push(child_index);
        }

        Ok(())
    }
}

/// Builds the tree rooted at `root_id`, or at the first record when no
/// record has that id.
///
/// Missing child references are dropped. A node reachable from two parents is
/// kept under the first one reached depth-first. A node that is its own
/// ancestor fails with [`MagnoliaError::CyclicHierarchy`].
pub fn build_hierarchy(store: &NodeStore, root_id: &str) -> Result<Tree, MagnoliaError> {
    let root_record = match store.index_of(root_id) {
        Some(index) => index,
        None => {
            info!(
                "event=root_fallback requested={root_id} using={}",
                store.first().id
            );
            0
        }
    };

    let mut builder = Builder {
        store,
        nodes: Vec::with_capacity(store.len()),
        placed: HashSet::with_capacity(store.len()),
        on_path: HashSet::new(),
        stack: Vec::new(),
    };
    builder.walk(root_record)?;

    let nodes = builder.nodes;
    let max_depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.clone(), index))
        .collect();

    debug!(
        "event=hierarchy_built root={} nodes={} depth={max_depth}",
        nodes[Tree::ROOT].id,
        nodes.len()
    );

    Ok(Tree {
        nodes,
        index_by_id,
        max_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnolia::node::Node;

    fn store(nodes: Vec<Node>) -> NodeStore {
        NodeStore::build(nodes).unwrap()
    }

    fn ids(tree: &Tree) -> Vec<&str> {
        tree.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn builds_three_node_tree() {
        let store = store(vec![
            Node::new("magnolia").with_children(["a", "b"]),
            Node::new("a"),
            Node::new("b"),
        ]);
        let tree = build_hierarchy(&store, "magnolia").unwrap();

        assert_eq!(ids(&tree), vec!["magnolia", "a", "b"]);
        assert_eq!(tree.root().children, vec![1, 2]);
        assert_eq!(tree.max_depth(), 1);
        assert!(tree.are_siblings(1, 2));
        assert_eq!(tree.links().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn falls_back_to_first_record() {
        let store = store(vec![Node::new("x").with_children(["y"]), Node::new("y")]);
        let tree = build_hierarchy(&store, "magnolia").unwrap();
        assert_eq!(tree.root().id, "x");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn drops_missing_children_and_excludes_unreachable() {
        let store = store(vec![
            Node::new("root").with_children(["ghost", "a"]),
            Node::new("a"),
            Node::new("island"),
        ]);
        let tree = build_hierarchy(&store, "root").unwrap();

        assert_eq!(ids(&tree), vec!["root", "a"]);
        assert!(!tree.contains("island"));
        assert!(store.contains("island"));
    }

    #[test]
    fn shared_child_is_placed_once() {
        let store = store(vec![
            Node::new("root").with_children(["a", "b"]),
            Node::new("a").with_children(["shared"]),
            Node::new("b").with_children(["shared", "shared"]),
            Node::new("shared"),
        ]);
        let tree = build_hierarchy(&store, "root").unwrap();

        assert_eq!(ids(&tree), vec!["root", "a", "shared", "b"]);
        let shared = tree.index_of("shared").unwrap();
        assert_eq!(tree.get(shared).unwrap().parent, tree.index_of("a"));
        assert!(tree.get(tree.index_of("b").unwrap()).unwrap().is_leaf());
    }

    #[test]
    fn cycle_is_reported() {
        let store = store(vec![
            Node::new("root").with_children(["a"]),
            Node::new("a").with_children(["b"]),
            Node::new("b").with_children(["root"]),
        ]);
        assert_eq!(
            build_hierarchy(&store, "root").unwrap_err(),
            MagnoliaError::CyclicHierarchy {
                id: "root".to_owned()
            }
        );
    }

    #[test]
    fn self_child_is_a_cycle() {
        let store = store(vec![Node::new("loop").with_children(["loop"])]);
        assert!(matches!(
            build_hierarchy(&store, "loop"),
            Err(MagnoliaError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn nodes_are_numbered_in_pre_order() {
        let store = store(vec![
            Node::new("root").with_children(["a", "b"]),
            Node::new("b").with_children(["b1"]),
            Node::new("a").with_children(["a1"]),
            Node::new("a1"),
            Node::new("b1"),
        ]);
        let tree = build_hierarchy(&store, "root").unwrap();

        assert_eq!(ids(&tree), vec!["root", "a", "a1", "b", "b1"]);
        let depths = tree.nodes().iter().map(|n| n.depth).collect::<Vec<_>>();
        assert_eq!(depths, vec![0, 1, 2, 1, 2]);
        assert_eq!(tree.get(4).unwrap().parent, Some(3));
    }

    #[test]
    fn deep_chain_does_not_exhaust_the_stack() {
        const DEPTH: usize = 200_000;
        let nodes = (0..DEPTH)
            .map(|level| {
                let node = Node::new(format!("n{level}"));
                if level + 1 < DEPTH {
                    node.with_children([format!("n{}", level + 1)])
                } else {
                    node
                }
            })
            .collect();
        let tree = build_hierarchy(&store(nodes), "n0").unwrap();

        assert_eq!(tree.len(), DEPTH);
        assert_eq!(tree.max_depth(), DEPTH - 1);
    }
}
