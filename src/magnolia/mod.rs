mod error;
mod hierarchy;
mod latent;
mod layout;
mod load;
mod map;
mod node;
mod parse;
mod store;
mod view;

pub use error::MagnoliaError;
pub use hierarchy::{Tree, TreeNode, build_hierarchy};
pub use latent::{
    LatentEdge, LatentSegment, candidate_edges, resolve_segments, reveal_count,
    sample_latent_edges,
};
pub use layout::{
    AngularStrategy, DEFAULT_MAX_RADIUS, LayoutConfig, Point, PositionedNode, RadialLayout,
    TreeLink, project, radial_layout, separation,
};
pub use load::load_dataset;
pub use map::{DEFAULT_ROOT_ID, MagnoliaMap, MapConfig};
pub use node::{LAYER_ORDER, Node, Relations};
pub use parse::parse_dataset;
pub use store::NodeStore;
pub use view::{DEFAULT_MEANING, Lens, Scene, ViewState};
