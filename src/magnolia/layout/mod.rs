use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;
use serde::Serialize;

use super::error::MagnoliaError;
use super::hierarchy::Tree;

mod slots;
mod tidy;

pub const DEFAULT_MAX_RADIUS: f64 = 340.0;

/// How raw angular positions are assigned before normalisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AngularStrategy {
    /// Leaves take consecutive slots; parents sit at the mean of their children.
    #[default]
    #[value(name = "slots")]
    LeafSlots,
    /// Reingold-Tilford tidy tree; parents sit midway between first and last child.
    Tidy,
}

impl AngularStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::LeafSlots => "leaf slots",
            Self::Tidy => "tidy tree",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub angular_span: f64,
    pub max_radius: f64,
    pub strategy: AngularStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            angular_span: TAU,
            max_radius: DEFAULT_MAX_RADIUS,
            strategy: AngularStrategy::default(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), MagnoliaError> {
        if self.angular_span.is_nan() || self.angular_span <= 0.0 || self.angular_span > TAU {
            return Err(MagnoliaError::InvalidLayoutConfig(format!(
                "angular span must be in (0, 2π], got {}",
                self.angular_span
            )));
        }
        if !self.max_radius.is_finite() || self.max_radius < 0.0 {
            return Err(MagnoliaError::InvalidLayoutConfig(format!(
                "max radius must be finite and non-negative, got {}",
                self.max_radius
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    /// Index into [`Tree::nodes`].
    pub index: usize,
    pub depth: usize,
    pub theta: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

impl PositionedNode {
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Parent-to-child edge with both endpoints already placed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeLink {
    pub source_id: String,
    pub target_id: String,
    pub source: Point,
    pub target: Point,
}

/// One layout pass over a tree. Positions are indexed like the tree's nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayout {
    nodes: Vec<PositionedNode>,
    links: Vec<TreeLink>,
    index_by_id: HashMap<String, usize>,
}

impl RadialLayout {
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[TreeLink] {
        &self.links
    }

    pub fn get(&self, id: &str) -> Option<&PositionedNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.get(id).map(PositionedNode::point)
    }

    /// Largest distance of any node from the centre.
    pub fn extent(&self) -> f64 {
        self.nodes
            .iter()
            .map(|node| node.radius)
            .fold(0.0, f64::max)
    }
}

/// Relative gap between two adjacent nodes: 1 for siblings, 2 otherwise.
pub fn separation(tree: &Tree, a: usize, b: usize) -> f64 {
    if tree.are_siblings(a, b) { 1.0 } else { 2.0 }
}

/// Polar to Cartesian with angle 0 pointing up.
pub fn project(theta: f64, radius: f64) -> Point {
    let angle = theta - FRAC_PI_2;
    Point {
        x: angle.cos() * radius,
        y: angle.sin() * radius,
    }
}

pub fn radial_layout(tree: &Tree, config: &LayoutConfig) -> Result<RadialLayout, MagnoliaError> {
    config.validate()?;

    let raw = match config.strategy {
        AngularStrategy::LeafSlots => slots::raw_angles(tree),
        AngularStrategy::Tidy => tidy::raw_angles(tree),
    };

    // Pre-order scan with strict comparisons: ties keep the earliest node.
    let mut left = Tree::ROOT;
    let mut right = Tree::ROOT;
    for (index, &value) in raw.iter().enumerate() {
        if value < raw[left] {
            left = index;
        }
        if value > raw[right] {
            right = index;
        }
    }

    let half_gap = if left == right {
        1.0
    } else {
        separation(tree, left, right) / 2.0
    };
    let offset = half_gap - raw[left];
    let angle_scale = config.angular_span / (raw[right] + half_gap + offset);
    let radius_scale = config.max_radius / tree.max_depth().max(1) as f64;

    let nodes = tree
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let theta = (raw[index] + offset) * angle_scale;
            let radius = node.depth as f64 * radius_scale;
            let Point { x, y } = project(theta, radius);
            PositionedNode {
                id: node.id.clone(),
                index,
                depth: node.depth,
                theta,
                radius,
                x,
                y,
            }
        })
        .collect::<Vec<_>>();

    let links = tree
        .links()
        .map(|(source, target)| TreeLink {
            source_id: nodes[source].id.clone(),
            target_id: nodes[target].id.clone(),
            source: nodes[source].point(),
            target: nodes[target].point(),
        })
        .collect();

    let index_by_id = nodes
        .iter()
        .map(|node| (node.id.clone(), node.index))
        .collect();

    debug!(
        "event=layout_computed strategy={} nodes={} span={} max_radius={}",
        config.strategy.label(),
        nodes.len(),
        config.angular_span,
        config.max_radius
    );

    Ok(RadialLayout {
        nodes,
        links,
        index_by_id,
    })
}
