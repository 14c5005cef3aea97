use eframe::egui::{self, RichText, Ui};

use magnolia_map::util::format_degrees;

use super::super::ViewModel;

fn capitalize(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ViewModel {
    /// Ancestor chain from the tree root down to `id`, when `id` is placed.
    fn path_from_root(&self, id: &str) -> Option<Vec<String>> {
        let tree = self.map.tree();
        let mut cursor = tree.index_of(id);
        let mut path = Vec::new();
        while let Some(index) = cursor {
            let node = tree.get(index)?;
            path.push(node.id.clone());
            cursor = node.parent;
        }
        if path.is_empty() {
            return None;
        }
        path.reverse();
        Some(path)
    }

    fn draw_id_links(&mut self, ui: &mut Ui, ids: &[String]) {
        let mut clicked = None;
        ui.horizontal_wrapped(|ui| {
            for id in ids {
                match self.map.select_node(id) {
                    Some(node) => {
                        if ui.link(node.title()).on_hover_text(id.as_str()).clicked() {
                            clicked = Some(id.clone());
                        }
                    }
                    None => {
                        ui.label(RichText::new(id.as_str()).weak())
                            .on_hover_text("Not present in the dataset.");
                    }
                }
            }
        });
        if clicked.is_some() {
            self.set_selected(clicked);
        }
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.view.selected.clone() else {
            ui.label("Select a node on the map.");
            return;
        };

        let Some(node) = self.map.select_node(&selected_id).cloned() else {
            ui.label("Selected node is not part of the dataset.");
            return;
        };

        ui.label(RichText::new(node.heading()).strong().size(18.0));
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        if let Some(codepoint) = node.codepoint.as_deref().filter(|text| !text.is_empty()) {
            ui.label(format!("Codepoint: {codepoint}"));
        }

        let mut has_layers = false;
        for (category, text) in node.ordered_layers() {
            has_layers = true;
            ui.add_space(4.0);
            ui.label(RichText::new(capitalize(category)).strong());
            ui.label(text);
        }
        if !has_layers {
            ui.label(RichText::new("No layer descriptions.").weak());
        }

        ui.separator();
        ui.label(RichText::new("Placement").strong());
        match self.map.layout().get(&selected_id) {
            Some(position) => {
                ui.label(format!("Angle: {}", format_degrees(position.theta)));
                ui.label(format!("Radius: {:.1}", position.radius));
                ui.label(format!("Depth: {}", position.depth));
            }
            None => {
                ui.label("Not reachable from the root; it has no position on the map.");
            }
        }

        if let Some(path) = self.path_from_root(&selected_id)
            && path.len() > 1
        {
            ui.add_space(4.0);
            ui.label(RichText::new("Path from root").strong());
            egui::ScrollArea::horizontal()
                .id_salt("root_path_scroll")
                .show(ui, |ui| self.draw_id_links(ui, &path));
        }

        if !node.children.is_empty() {
            ui.separator();
            ui.label(RichText::new(format!("Children ({})", node.children.len())).strong());
            self.draw_id_links(ui, &node.children);
        }

        let correspondences = &node.relations.corresponds_to;
        if !correspondences.is_empty() {
            ui.separator();
            ui.label(
                RichText::new(format!("Corresponds to ({})", correspondences.len())).strong(),
            );
            self.draw_id_links(ui, correspondences);
        }
    }
}
