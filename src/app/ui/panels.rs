use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, RichText, Vec2};

use magnolia_map::magnolia::{MagnoliaMap, ViewState};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(map: MagnoliaMap, view: ViewState) -> Self {
        let view = if view.selected.is_none() {
            view.with_selected(Some(map.root().id.clone()))
        } else {
            view
        };
        let scene = map.scene(&view);

        Self {
            map,
            view,
            scene,
            search: String::new(),
            search_match_cache: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            needs_fit: true,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Magnolia Map");
                    ui.separator();
                    ui.label(format!("root: {}", self.map.root().title()));
                    ui.label(format!("dataset: {}", dataset.display()));
                    ui.label(format!("records: {}", self.map.store().len()));
                    ui.label(format!("in tree: {}", self.map.tree().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(self.view.status_text()).strong());
                        ui.label(format!(
                            "latent: {}/{}",
                            self.scene.latent.len(),
                            self.map.latent_candidate_count()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading dataset...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
