use eframe::egui::{self, Key, Response, Ui};

use magnolia_map::magnolia::{AngularStrategy, MapConfig};

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f64 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f64 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f64 = 40.0;

const MAX_RADIUS_RANGE: std::ops::RangeInclusive<f64> = 80.0..=900.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f64,
    negative_secs: f64,
}

fn slider_key_accel_multiplier(hold_secs: f64) -> f64 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Held arrow keys nudge a focused slider, faster the longer they are held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f64,
    min: f64,
    max: f64,
    step: f64,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            f64::from(input.stable_dt.min(0.1)),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = f64::from(i8::from(increase_down) - i8::from(decrease_down));
    if direction == 0.0 {
        return false;
    }

    let hold_secs = if direction > 0.0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let old_value = *value;
    *value = (*value + direction * step * speed * delta_time).clamp(min, max);
    ui.ctx().request_repaint();

    (*value - old_value).abs() > f64::EPSILON
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Lenses");
        ui.separator();
        ui.add_space(4.0);

        let mut potential = self.view.potential;
        let mut projection = self.view.projection;
        let mut meaning = self.view.meaning;

        ui.horizontal_wrapped(|ui| {
            ui.toggle_value(&mut potential, "⭕ Potential")
                .on_hover_text("Overlay correspondences between records as curved edges.");
            ui.toggle_value(&mut projection, "🌳 Projection")
                .on_hover_text("Show the parent/child links of the radial tree.");
        });

        ui.add_space(4.0);
        let meaning_slider = ui
            .add_enabled(
                potential,
                egui::Slider::new(&mut meaning, 0.0..=1.0)
                    .step_by(0.01)
                    .text("Meaning")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of latent edges revealed while the potential lens is on.");
        if meaning_slider.hovered() {
            meaning_slider.request_focus();
        }
        apply_slider_arrow_acceleration(ui, &meaning_slider, &mut meaning, 0.0, 1.0, 0.005);

        let next = self
            .view
            .with_potential(potential)
            .with_projection(projection)
            .with_meaning(meaning);
        self.set_view(next);

        ui.separator();

        ui.label("Search (label or id)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Type to highlight matching nodes, then click one to select it.");
        if let Some(matches) = self.cached_search_matches() {
            ui.small(format!("{} matching records", matches.len()));
        }

        ui.separator();
        ui.heading("Layout");
        ui.add_space(4.0);

        let mut config: MapConfig = self.map.config().clone();

        ui.horizontal_wrapped(|ui| {
            for strategy in [AngularStrategy::LeafSlots, AngularStrategy::Tidy] {
                ui.selectable_value(&mut config.layout.strategy, strategy, strategy.label());
            }
        });

        let radius_slider = ui
            .add(
                egui::Slider::new(&mut config.layout.max_radius, MAX_RADIUS_RANGE)
                    .step_by(10.0)
                    .text("Max radius")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Distance of the deepest ring from the centre.");
        if radius_slider.hovered() {
            radius_slider.request_focus();
        }
        apply_slider_arrow_acceleration(
            ui,
            &radius_slider,
            &mut config.layout.max_radius,
            *MAX_RADIUS_RANGE.start(),
            *MAX_RADIUS_RANGE.end(),
            10.0,
        );

        let config_changed = &config != self.map.config();
        self.apply_config(config);

        ui.add_space(6.0);
        if ui.button("Reset view").clicked() || config_changed {
            self.needs_fit = true;
        }

        ui.separator();
        ui.small("Scroll to zoom, drag to pan, click a node to inspect it.");
    }
}
