use serde::Serialize;

use crate::util::clamp_unit;

use super::latent::LatentSegment;
use super::layout::{PositionedNode, TreeLink};

pub const DEFAULT_MEANING: f64 = 0.4;

/// Snapshot of the user-controlled view parameters.
///
/// Every change produces a new snapshot; derived output is recomputed from
/// scratch for each one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewState {
    pub potential: bool,
    pub projection: bool,
    pub meaning: f64,
    pub selected: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            potential: false,
            projection: true,
            meaning: DEFAULT_MEANING,
            selected: None,
        }
    }
}

impl ViewState {
    pub fn with_meaning(&self, meaning: f64) -> Self {
        Self {
            meaning: clamp_unit(meaning),
            ..self.clone()
        }
    }

    pub fn with_potential(&self, potential: bool) -> Self {
        Self {
            potential,
            ..self.clone()
        }
    }

    pub fn with_projection(&self, projection: bool) -> Self {
        Self {
            projection,
            ..self.clone()
        }
    }

    pub fn toggle_potential(&self) -> Self {
        self.with_potential(!self.potential)
    }

    pub fn toggle_projection(&self) -> Self {
        self.with_projection(!self.projection)
    }

    pub fn with_selected(&self, selected: Option<String>) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }

    pub fn lens(&self) -> Lens {
        if self.potential {
            Lens::Potential
        } else {
            Lens::Projection
        }
    }

    /// Lens label for the status chip, noting when tree links are hidden.
    pub fn status_text(&self) -> String {
        let label = self.lens().label();
        if self.projection {
            label.to_owned()
        } else {
            format!("{label} · tree links hidden")
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    Potential,
    Projection,
}

impl Lens {
    pub fn label(self) -> &'static str {
        match self {
            Self::Potential => "Potential (⭕) active",
            Self::Projection => "Projection (🌳) active",
        }
    }
}

/// Everything a renderer needs for one frame of the map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub lens: Lens,
    pub meaning: f64,
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<TreeLink>,
    pub latent: Vec<LatentSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_controls() {
        let view = ViewState::default();
        assert!(!view.potential);
        assert!(view.projection);
        assert_eq!(view.meaning, DEFAULT_MEANING);
        assert_eq!(view.lens(), Lens::Projection);
    }

    #[test]
    fn updates_leave_the_previous_snapshot_untouched() {
        let before = ViewState::default();
        let after = before.toggle_potential().with_meaning(0.9);

        assert!(!before.potential);
        assert_eq!(before.meaning, DEFAULT_MEANING);
        assert!(after.potential);
        assert_eq!(after.meaning, 0.9);
        assert_eq!(after.lens(), Lens::Potential);
    }

    #[test]
    fn meaning_is_clamped() {
        let view = ViewState::default();
        assert_eq!(view.with_meaning(4.0).meaning, 1.0);
        assert_eq!(view.with_meaning(-1.0).meaning, 0.0);
        assert_eq!(view.with_meaning(f64::NAN).meaning, 0.0);
    }

    #[test]
    fn status_text_mentions_hidden_links() {
        let view = ViewState::default();
        assert_eq!(view.status_text(), "Projection (🌳) active");
        assert_eq!(
            view.toggle_projection().status_text(),
            "Projection (🌳) active · tree links hidden"
        );
        assert_eq!(
            view.toggle_potential().toggle_projection().status_text(),
            "Potential (⭕) active · tree links hidden"
        );
    }
}
