//! Linear-time tidy tree (Walker's algorithm as improved by Buchheim, Jünger
//! and Leipert). Produces unnormalised angular positions.
//!
//! The walker works on tree indices plus one extra slot, `virtual_root`, which
//! acts as the parent of the real root so the root needs no special casing.

use crate::magnolia::hierarchy::Tree;

use super::separation;

static ROOT_ONLY: [usize; 1] = [Tree::ROOT];

struct Walker<'a> {
    tree: &'a Tree,
    virtual_root: usize,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    ancestor: Vec<usize>,
    thread: Vec<Option<usize>>,
    /// Default ancestor for each node's children while they are being placed.
    default_ancestor: Vec<Option<usize>>,
    sibling_index: Vec<usize>,
}

impl<'a> Walker<'a> {
    fn new(tree: &'a Tree) -> Self {
        let slots = tree.len() + 1;
        let mut sibling_index = vec![0; slots];
        for node in tree.nodes() {
            for (position, &child) in node.children.iter().enumerate() {
                sibling_index[child] = position;
            }
        }

        Self {
            tree,
            virtual_root: tree.len(),
            prelim: vec![0.0; slots],
            modifier: vec![0.0; slots],
            change: vec![0.0; slots],
            shift: vec![0.0; slots],
            ancestor: (0..slots).collect(),
            thread: vec![None; slots],
            default_ancestor: vec![None; slots],
            sibling_index,
        }
    }

    fn parent(&self, v: usize) -> usize {
        self.tree.nodes()[v].parent.unwrap_or(self.virtual_root)
    }

    fn children(&self, v: usize) -> &'a [usize] {
        if v == self.virtual_root {
            &ROOT_ONLY
        } else {
            &self.tree.nodes()[v].children
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children(v).first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children(v).last().copied().or(self.thread[v])
    }

    fn move_subtree(&mut self, left: usize, right: usize, amount: f64) {
        let subtrees = self.sibling_index[right] as f64 - self.sibling_index[left] as f64;
        let change = amount / subtrees;
        self.change[right] -= change;
        self.shift[right] += amount;
        self.change[left] += change;
        self.prelim[right] += amount;
        self.modifier[right] += amount;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in self.children(v).iter().rev() {
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn next_ancestor(&self, inside_left: usize, v: usize, fallback: usize) -> usize {
        let candidate = self.ancestor[inside_left];
        if self.parent(candidate) == self.parent(v) {
            candidate
        } else {
            fallback
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.parent(v);
        let siblings = self.children(parent);
        let index = self.sibling_index[v];
        let left_sibling = (index > 0).then(|| siblings[index - 1]);
        let children = self.children(v);

        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = left_sibling {
                self.prelim[v] = self.prelim[w] + separation(self.tree, v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.prelim[v] = self.prelim[w] + separation(self.tree, v, w);
        }

        let fallback = self.default_ancestor[parent].unwrap_or(siblings[0]);
        self.default_ancestor[parent] = Some(self.apportion(v, left_sibling, fallback));
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut default: usize) -> usize {
        let Some(w) = left_sibling else {
            return default;
        };

        let mut inside_right = v;
        let mut outside_right = v;
        let mut inside_left = w;
        let mut outside_left = self.children(self.parent(v))[0];
        let mut sum_inside_right = self.modifier[inside_right];
        let mut sum_outside_right = self.modifier[outside_right];
        let mut sum_inside_left = self.modifier[inside_left];
        let mut sum_outside_left = self.modifier[outside_left];

        let (tail_left, tail_right) = loop {
            let (Some(next_inside_left), Some(next_inside_right)) =
                (self.next_right(inside_left), self.next_left(inside_right))
            else {
                break (
                    self.next_right(inside_left),
                    self.next_left(inside_right),
                );
            };
            inside_left = next_inside_left;
            inside_right = next_inside_right;

            if let (Some(left), Some(right)) =
                (self.next_left(outside_left), self.next_right(outside_right))
            {
                outside_left = left;
                outside_right = right;
            }
            self.ancestor[outside_right] = v;

            let amount = self.prelim[inside_left] + sum_inside_left
                - self.prelim[inside_right]
                - sum_inside_right
                + separation(self.tree, inside_left, inside_right);
            if amount > 0.0 {
                let from = self.next_ancestor(inside_left, v, default);
                self.move_subtree(from, v, amount);
                sum_inside_right += amount;
                sum_outside_right += amount;
            }

            sum_inside_left += self.modifier[inside_left];
            sum_inside_right += self.modifier[inside_right];
            sum_outside_left += self.modifier[outside_left];
            sum_outside_right += self.modifier[outside_right];
        };

        if tail_left.is_some() && self.next_right(outside_right).is_none() {
            self.thread[outside_right] = tail_left;
            self.modifier[outside_right] += sum_inside_left - sum_outside_right;
        }

        if tail_right.is_some() && self.next_left(outside_left).is_none() {
            self.thread[outside_left] = tail_right;
            self.modifier[outside_left] += sum_inside_right - sum_outside_left;
            default = v;
        }

        default
    }
}

fn post_order(tree: &Tree) -> Vec<usize> {
    let mut order = Vec::with_capacity(tree.len());
    let mut stack = vec![(Tree::ROOT, 0usize)];

    while let Some((node, next_child)) = stack.pop() {
        let children = &tree.nodes()[node].children;
        if let Some(&child) = children.get(next_child) {
            stack.push((node, next_child + 1));
            stack.push((child, 0));
        } else {
            order.push(node);
        }
    }

    order
}

pub(super) fn raw_angles(tree: &Tree) -> Vec<f64> {
    let mut walker = Walker::new(tree);

    for v in post_order(tree) {
        walker.first_walk(v);
    }
    walker.modifier[walker.virtual_root] = -walker.prelim[Tree::ROOT];

    // Pre-order: parents precede their children in tree index order.
    let mut raw = vec![0.0; tree.len()];
    for (v, slot) in raw.iter_mut().enumerate() {
        let parent = walker.parent(v);
        *slot = walker.prelim[v] + walker.modifier[parent];
        walker.modifier[v] += walker.modifier[parent];
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnolia::hierarchy::build_hierarchy;
    use crate::magnolia::node::Node;
    use crate::magnolia::store::NodeStore;

    const EPS: f64 = 1e-9;

    fn tree_of(nodes: Vec<Node>) -> Tree {
        let store = NodeStore::build(nodes).unwrap();
        build_hierarchy(&store, "root").unwrap()
    }

    fn raw_by_id(tree: &Tree) -> impl Fn(&str) -> f64 + '_ {
        let raw = raw_angles(tree);
        move |id| raw[tree.index_of(id).unwrap()]
    }

    #[test]
    fn post_order_visits_children_first_in_order() {
        let tree = tree_of(vec![
            Node::new("root").with_children(["a", "b"]),
            Node::new("a").with_children(["a1", "a2"]),
            Node::new("b"),
            Node::new("a1"),
            Node::new("a2"),
        ]);
        let ids = post_order(&tree)
            .into_iter()
            .map(|index| tree.nodes()[index].id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a1", "a2", "a", "b", "root"]);
    }

    #[test]
    fn leaf_siblings_are_unit_spaced_around_parent() {
        let tree = tree_of(vec![
            Node::new("root").with_children(["a", "b", "c"]),
            Node::new("a"),
            Node::new("b"),
            Node::new("c"),
        ]);
        let at = raw_by_id(&tree);
        assert!((at("a") + 1.0).abs() < EPS);
        assert!(at("b").abs() < EPS);
        assert!((at("c") - 1.0).abs() < EPS);
        assert!(at("root").abs() < EPS);
    }

    #[test]
    fn cousin_contours_are_pushed_apart() {
        // a3 (under a) and c1 (under c) are adjacent at depth two; they must
        // end up two units apart even though b sits between a and c.
        let tree = tree_of(vec![
            Node::new("root").with_children(["a", "b", "c"]),
            Node::new("a").with_children(["a1", "a2", "a3"]),
            Node::new("b"),
            Node::new("c").with_children(["c1", "c2"]),
            Node::new("a1"),
            Node::new("a2"),
            Node::new("a3"),
            Node::new("c1"),
            Node::new("c2"),
        ]);
        let at = raw_by_id(&tree);

        assert!((at("c1") - at("a3") - 2.0).abs() < EPS);
        assert!((at("b") - at("a") - 1.75).abs() < EPS);
        assert!((at("c") - at("b") - 1.75).abs() < EPS);
        assert!((at("root") - (at("a") + at("c")) / 2.0).abs() < EPS);
    }
}
