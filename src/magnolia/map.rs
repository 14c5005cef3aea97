use log::info;

use super::error::MagnoliaError;
use super::hierarchy::{Tree, build_hierarchy};
use super::latent::{candidate_edges, resolve_segments, sample_latent_edges};
use super::layout::{LayoutConfig, RadialLayout, radial_layout};
use super::node::Node;
use super::store::NodeStore;
use super::view::{Scene, ViewState};

pub const DEFAULT_ROOT_ID: &str = "magnolia";

#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub root_id: String,
    pub layout: LayoutConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_owned(),
            layout: LayoutConfig::default(),
        }
    }
}

/// One loaded dataset with its tree and the layout every consumer reads
/// positions from.
#[derive(Clone, Debug)]
pub struct MagnoliaMap {
    store: NodeStore,
    tree: Tree,
    layout: RadialLayout,
    config: MapConfig,
    latent_candidates: usize,
}

impl MagnoliaMap {
    pub fn new(store: NodeStore, config: &MapConfig) -> Result<Self, MagnoliaError> {
        let tree = build_hierarchy(&store, &config.root_id)?;
        let layout = radial_layout(&tree, &config.layout)?;
        let latent_candidates = candidate_edges(&store).len();

        info!(
            "event=map_ready root={} records={} tree_nodes={} depth={} latent_candidates={latent_candidates} dangling_refs={}",
            tree.root().id,
            store.len(),
            tree.len(),
            tree.max_depth(),
            store.dangling_reference_count()
        );

        Ok(Self {
            store,
            tree,
            layout,
            config: config.clone(),
            latent_candidates,
        })
    }

    pub fn from_records(records: Vec<Node>, config: &MapConfig) -> Result<Self, MagnoliaError> {
        Self::new(NodeStore::build(records)?, config)
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn root(&self) -> &Node {
        &self.store.all()[self.tree.root().record]
    }

    pub fn latent_candidate_count(&self) -> usize {
        self.latent_candidates
    }

    /// Full record for the details view.
    pub fn select_node(&self, id: &str) -> Option<&Node> {
        self.store.lookup(id)
    }

    /// Same dataset under a new configuration. The current map is left as is.
    pub fn relayout(&self, config: &MapConfig) -> Result<Self, MagnoliaError> {
        Self::new(self.store.clone(), config)
    }

    pub fn scene(&self, view: &ViewState) -> Scene {
        let links = if view.projection {
            self.layout.links().to_vec()
        } else {
            Vec::new()
        };

        let latent = if view.potential {
            let edges = sample_latent_edges(&self.store, view.meaning);
            resolve_segments(&edges, &self.layout)
        } else {
            Vec::new()
        };

        Scene {
            lens: view.lens(),
            meaning: view.meaning,
            nodes: self.layout.nodes().to_vec(),
            links,
            latent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnolia::layout::AngularStrategy;
    use crate::magnolia::view::Lens;

    fn records() -> Vec<Node> {
        vec![
            Node::new("magnolia")
                .with_children(["bark", "bloom"])
                .with_correspondences(["bark"]),
            Node::new("bark").with_correspondences(["bloom"]),
            Node::new("bloom"),
            Node::new("lotus").with_correspondences(["magnolia"]),
        ]
    }

    #[test]
    fn projection_lens_shows_tree_only() {
        let map = MagnoliaMap::from_records(records(), &MapConfig::default()).unwrap();
        let scene = map.scene(&ViewState::default());

        assert_eq!(scene.lens, Lens::Projection);
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.links.len(), 2);
        assert!(scene.latent.is_empty());
    }

    #[test]
    fn potential_lens_adds_latent_overlay() {
        let map = MagnoliaMap::from_records(records(), &MapConfig::default()).unwrap();
        let view = ViewState::default().toggle_potential().with_meaning(1.0);
        let scene = map.scene(&view);

        // magnolia -> bark comes from the larger id and is ignored;
        // ("lotus", "magnolia") is a candidate but lotus is not in the tree.
        assert_eq!(map.latent_candidate_count(), 2);
        assert_eq!(scene.latent.len(), 1);
        assert_eq!(scene.latent[0].edge.a, "bark");
        assert_eq!(scene.latent[0].edge.b, "bloom");
        assert_eq!(Some(scene.latent[0].a), map.layout().position_of("bark"));
    }

    #[test]
    fn projection_off_hides_links() {
        let map = MagnoliaMap::from_records(records(), &MapConfig::default()).unwrap();
        let scene = map.scene(&ViewState::default().toggle_projection());
        assert!(scene.links.is_empty());
        assert_eq!(scene.nodes.len(), 3);
    }

    #[test]
    fn select_node_reaches_records_outside_the_tree() {
        let map = MagnoliaMap::from_records(records(), &MapConfig::default()).unwrap();
        assert_eq!(map.select_node("lotus").map(|n| n.id.as_str()), Some("lotus"));
        assert!(map.select_node("nope").is_none());
        assert_eq!(map.root().id, "magnolia");
    }

    #[test]
    fn relayout_produces_a_fresh_layout() {
        let map = MagnoliaMap::from_records(records(), &MapConfig::default()).unwrap();
        let config = MapConfig {
            layout: LayoutConfig {
                max_radius: 100.0,
                strategy: AngularStrategy::Tidy,
                ..LayoutConfig::default()
            },
            ..MapConfig::default()
        };
        let wider = map.relayout(&config).unwrap();

        assert!((wider.layout().extent() - 100.0).abs() < 1e-9);
        assert!((map.layout().extent() - 340.0).abs() < 1e-9);
    }
}
