use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use magnolia_map::util::short_label;

use super::super::render_utils::{
    INK, SEARCH_MATCH, SELECTED, blend_color, circle_visible, depth_color, draw_background, fit_zoom,
    segment_visible, to_world, with_alpha, world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};

const NODE_RADIUS: f32 = 4.0;
const LABEL_MAX_CHARS: usize = 28;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Ids of records whose label or id fuzzily match the search box.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<String>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .map
            .store()
            .all()
            .iter()
            .filter(|node| {
                fuzzy_match_score(&matcher, node.title(), query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, query).is_some()
            })
            .map(|node| node.id.clone())
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.needs_fit {
            self.zoom = fit_zoom(rect, self.map.layout().extent() as f32);
            self.pan = Vec2::ZERO;
            self.needs_fit = false;
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let pan = self.pan;
        let zoom = self.zoom;
        let max_depth = self.map.tree().max_depth();
        let ring_step = if max_depth == 0 {
            0.0
        } else {
            (self.map.config().layout.max_radius as f32 / max_depth as f32) * zoom
        };
        draw_background(&painter, rect, rect.center() + pan, ring_step, max_depth);

        let search_matches = self.cached_search_matches();
        let project = |point| world_to_screen(rect, pan, zoom, to_world(point));

        let screen_positions = self
            .scene
            .nodes
            .iter()
            .map(|node| project(node.point()))
            .collect::<Vec<Pos2>>();

        let zoom_sqrt = zoom.sqrt();
        for segment in &self.scene.latent {
            let points = [
                project(segment.a),
                project(segment.control_point()),
                project(segment.b),
            ];
            if !segment_visible(rect, points[0], points[2]) && !rect.contains(points[1]) {
                continue;
            }
            painter.add(QuadraticBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new((1.0 * zoom_sqrt).clamp(0.6, 2.4), with_alpha(SELECTED, 0.5)),
            ));
        }

        let link_stroke = Stroke::new((1.2 * zoom_sqrt).clamp(0.6, 3.0), with_alpha(INK, 0.35));
        for link in &self.scene.links {
            let start = project(link.source);
            let end = project(link.target);
            if segment_visible(rect, start, end) {
                painter.line_segment([start, end], link_stroke);
            }
        }

        let node_radius = (NODE_RADIUS * zoom.powf(0.4)).clamp(2.5, 12.0);
        let hovered = Self::hovered_index(ui, &screen_positions, node_radius + 4.0);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let mut selection_animating = false;
        for (index, node) in self.scene.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, node_radius + 40.0) {
                continue;
            }

            let is_selected = self.view.selected.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered.is_some_and(|(hovered, _)| hovered == index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&node.id));

            let base = depth_color(node.depth, max_depth);
            let base = if is_match {
                blend_color(base, SEARCH_MATCH, 0.75)
            } else if search_matches.is_some() {
                with_alpha(base, 0.35)
            } else {
                base
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", node.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            let color = blend_color(base, SELECTED, selection_mix);
            let radius = node_radius * (1.0 + selection_mix * 0.5) + if is_hovered { 1.5 } else { 0.0 };
            painter.circle_filled(position, radius, color);
            if selection_mix > 0.0 {
                painter.circle_stroke(
                    position,
                    radius + 3.0 + (1.0 - selection_mix) * 5.0,
                    Stroke::new(1.2, with_alpha(SELECTED, 0.3 + selection_mix * 0.4)),
                );
            }

            let label = self
                .map
                .select_node(&node.id)
                .map_or(node.id.as_str(), |record| record.title());
            let text_alpha = if search_matches.is_some() && !is_match { 0.4 } else { 0.95 };
            painter.text(
                position - vec2(0.0, radius + 3.0),
                Align2::CENTER_BOTTOM,
                short_label(label, LABEL_MAX_CHARS),
                FontId::proportional(12.0),
                with_alpha(INK, text_alpha),
            );
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some((index, _)) = hovered
            && let Some(node) = self.scene.nodes.get(index)
        {
            let children = self
                .map
                .tree()
                .get(node.index)
                .map_or(0, |tree_node| tree_node.children.len());
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  depth {}  |  children {children}", node.id, node.depth),
                FontId::proportional(13.0),
                INK,
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let selected = hovered
                .and_then(|(index, _)| self.scene.nodes.get(index))
                .map(|node| node.id.clone());
            if selected.is_some() {
                self.set_selected(selected);
            }
        }
    }
}
