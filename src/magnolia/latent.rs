use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::util::clamp_unit;

use super::layout::{Point, RadialLayout};
use super::store::NodeStore;

/// Undirected associative link, stored with `a < b`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LatentEdge {
    pub a: String,
    pub b: String,
}

/// A latent edge with both endpoints placed by the layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatentSegment {
    pub edge: LatentEdge,
    pub a: Point,
    pub b: Point,
}

impl LatentSegment {
    /// Height the overlay curve is lifted by above the chord midpoint.
    pub const ARC_LIFT: f64 = 30.0;

    /// Control point of the quadratic curve drawn for this segment.
    pub fn control_point(&self) -> Point {
        let mid = self.a.midpoint(self.b);
        Point {
            x: mid.x,
            y: mid.y - Self::ARC_LIFT,
        }
    }
}

/// Every associative relationship exactly once, in discovery order.
///
/// A pair `(a, b)` is emitted from the declaration on `a` with `a < b`; a
/// declaration on the larger id alone contributes nothing. Self-loops and
/// dangling ids are dropped, and repeated declarations collapse to one edge.
pub fn candidate_edges(store: &NodeStore) -> Vec<LatentEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for node in store.all() {
        for related in &node.relations.corresponds_to {
            if !store.contains(related) {
                debug!(
                    "event=unresolved_reference kind=corresponds_to from={} to={related}",
                    node.id
                );
                continue;
            }
            if node.id.as_str() >= related.as_str() {
                continue;
            }

            if seen.insert((node.id.as_str(), related.as_str())) {
                edges.push(LatentEdge {
                    a: node.id.clone(),
                    b: related.clone(),
                });
            }
        }
    }
    edges
}

/// How many of `count` candidates are revealed at `meaning`.
///
/// At least one whenever any candidate exists, so raising the threshold only
/// ever extends the revealed prefix.
pub fn reveal_count(count: usize, meaning: f64) -> usize {
    if count == 0 {
        return 0;
    }
    let take = (count as f64 * clamp_unit(meaning)).floor() as usize;
    take.clamp(1, count)
}

/// The first `reveal_count` candidates. Deterministic, never shuffled.
pub fn sample_latent_edges(store: &NodeStore, meaning: f64) -> Vec<LatentEdge> {
    let mut edges = candidate_edges(store);
    let take = reveal_count(edges.len(), meaning);
    edges.truncate(take);
    edges
}

/// Attaches layout positions; edges touching a node outside the tree are skipped.
pub fn resolve_segments(edges: &[LatentEdge], layout: &RadialLayout) -> Vec<LatentSegment> {
    edges
        .iter()
        .filter_map(|edge| {
            let a = layout.position_of(&edge.a)?;
            let b = layout.position_of(&edge.b)?;
            Some(LatentSegment {
                edge: edge.clone(),
                a,
                b,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnolia::hierarchy::build_hierarchy;
    use crate::magnolia::layout::{LayoutConfig, radial_layout};
    use crate::magnolia::node::Node;

    fn pair(a: &str, b: &str) -> LatentEdge {
        LatentEdge {
            a: a.to_owned(),
            b: b.to_owned(),
        }
    }

    fn rich_store() -> NodeStore {
        NodeStore::build(vec![
            Node::new("root")
                .with_children(["a", "b", "c"])
                .with_correspondences(["a", "root"]),
            Node::new("a").with_correspondences(["root", "b", "ghost"]),
            Node::new("b").with_correspondences(["a", "c"]),
            Node::new("c").with_correspondences(["island", "a", "c"]),
            Node::new("island"),
        ])
        .unwrap()
    }

    #[test]
    fn only_the_smaller_id_declares_an_edge() {
        let forward = NodeStore::build(vec![
            Node::new("a").with_correspondences(["b"]),
            Node::new("b"),
        ])
        .unwrap();
        let backward = NodeStore::build(vec![
            Node::new("a"),
            Node::new("b").with_correspondences(["a"]),
        ])
        .unwrap();

        assert_eq!(candidate_edges(&forward), vec![pair("a", "b")]);
        assert!(candidate_edges(&backward).is_empty());
    }

    #[test]
    fn mutual_declaration_yields_one_edge() {
        let store = NodeStore::build(vec![
            Node::new("a").with_correspondences(["b", "b"]),
            Node::new("b").with_correspondences(["a"]),
        ])
        .unwrap();

        assert_eq!(candidate_edges(&store), vec![pair("a", "b")]);
    }

    #[test]
    fn candidates_are_deduplicated_in_discovery_order() {
        let edges = candidate_edges(&rich_store());
        assert_eq!(
            edges,
            vec![
                pair("a", "root"),
                pair("a", "b"),
                pair("b", "c"),
                pair("c", "island"),
            ]
        );
    }

    #[test]
    fn zero_meaning_still_reveals_one() {
        let store = rich_store();
        assert_eq!(sample_latent_edges(&store, 0.0), vec![pair("a", "root")]);
        assert_eq!(reveal_count(0, 0.0), 0);
        assert_eq!(reveal_count(0, 1.0), 0);
    }

    #[test]
    fn meaning_scales_the_prefix() {
        let store = rich_store();
        assert_eq!(sample_latent_edges(&store, 0.4).len(), 1);
        assert_eq!(sample_latent_edges(&store, 0.5).len(), 2);
        assert_eq!(sample_latent_edges(&store, 0.74).len(), 2);
        assert_eq!(sample_latent_edges(&store, 0.75).len(), 3);
        assert_eq!(sample_latent_edges(&store, 1.0).len(), 4);
    }

    #[test]
    fn out_of_range_meaning_is_clamped() {
        let store = rich_store();
        assert_eq!(sample_latent_edges(&store, 7.5).len(), 4);
        assert_eq!(sample_latent_edges(&store, -3.0).len(), 1);
        assert_eq!(sample_latent_edges(&store, f64::NAN).len(), 1);
    }

    #[test]
    fn raising_meaning_only_extends_the_prefix() {
        let store = rich_store();
        let mut previous = sample_latent_edges(&store, 0.0);
        for step in 1..=20 {
            let current = sample_latent_edges(&store, step as f64 / 20.0);
            assert!(current.len() >= previous.len());
            assert_eq!(&current[..previous.len()], previous.as_slice());
            previous = current;
        }
    }

    #[test]
    fn segments_use_layout_positions_and_skip_untreed_nodes() {
        let store = rich_store();
        let tree = build_hierarchy(&store, "root").unwrap();
        let layout = radial_layout(&tree, &LayoutConfig::default()).unwrap();

        let edges = sample_latent_edges(&store, 1.0);
        let segments = resolve_segments(&edges, &layout);

        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.edge.b != "island"));
        let first = &segments[0];
        assert_eq!(Some(first.a), layout.position_of("a"));
        assert_eq!(Some(first.b), layout.position_of("root"));

        let control = first.control_point();
        assert!((control.y - (first.a.y + first.b.y) / 2.0 + 30.0).abs() < 1e-9);
    }
}
