use crate::magnolia::hierarchy::Tree;

use super::separation;

/// Leaves get consecutive positions spaced by the separation rule; every
/// internal node takes the mean of its children. Output is unnormalised.
pub(super) fn raw_angles(tree: &Tree) -> Vec<f64> {
    let mut raw = vec![0.0; tree.len()];

    let mut cursor = 0.0;
    let mut previous_leaf = None;
    for leaf in tree.leaves() {
        if let Some(previous) = previous_leaf {
            cursor += separation(tree, previous, leaf);
        }
        raw[leaf] = cursor;
        previous_leaf = Some(leaf);
    }

    // Reverse pre-order visits every child before its parent.
    for index in (0..tree.len()).rev() {
        let children = &tree.nodes()[index].children;
        if children.is_empty() {
            continue;
        }
        raw[index] = children.iter().map(|&child| raw[child]).sum::<f64>() / children.len() as f64;
    }

    raw
}
