use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use log::{debug, error, warn};

use magnolia_map::magnolia::{MagnoliaMap, MapConfig, Scene, ViewState, load_dataset};

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<MagnoliaMap, String>;

pub struct MagnoliaApp {
    dataset: PathBuf,
    config: MapConfig,
    initial_view: ViewState,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    map: MagnoliaMap,
    view: ViewState,
    scene: Scene,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    pan: Vec2,
    zoom: f32,
    needs_fit: bool,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<String>>,
}

impl MagnoliaApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: PathBuf,
        config: MapConfig,
        initial_view: ViewState,
    ) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(dataset.clone(), config.clone()),
        };
        Self {
            dataset,
            config,
            initial_view,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset: PathBuf, config: MapConfig) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&dataset)
                .and_then(|store| MagnoliaMap::new(store, &config).map_err(anyhow::Error::from))
                .map_err(|error| {
                    error!("event=dataset_load_failed path={} error={error:#}", dataset.display());
                    format!("{error:#}")
                });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(&self) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(self.dataset.clone(), self.config.clone()),
        }
    }

    fn ready_state(map: MagnoliaMap, view: ViewState) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(map, view)))
    }
}

impl eframe::App for MagnoliaApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(map)) => transition = Some(Self::ready_state(map, self.initial_view.clone())),
                    Ok(Err(message)) => transition = Some(AppState::Error(message)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading Magnolia Map...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Setup error");
                    ui.add_space(6.0);
                    ui.label("There was a problem loading the dataset.");
                    ui.add_space(4.0);
                    ui.monospace(message.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    transition = Some(self.start_load());
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset, &mut reload_requested, is_reloading);
                let current_view = model.view.clone();

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.dataset.clone(),
                        model.map.config().clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(map)) => {
                            transition = Some(Self::ready_state(map, current_view));
                        }
                        Ok(Err(message)) => transition = Some(AppState::Error(message)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    /// Replaces the view snapshot and recomputes the scene when it changed.
    fn set_view(&mut self, next: ViewState) {
        if next == self.view {
            return;
        }

        debug!(
            "event=view_changed potential={} projection={} meaning={:.2} selected={:?}",
            next.potential, next.projection, next.meaning, next.selected
        );
        self.scene = self.map.scene(&next);
        self.view = next;
    }

    fn set_selected(&mut self, selected: Option<String>) {
        let next = self.view.with_selected(selected);
        self.set_view(next);
    }

    fn apply_config(&mut self, config: MapConfig) {
        if &config == self.map.config() {
            return;
        }

        match self.map.relayout(&config) {
            Ok(map) => {
                self.map = map;
                self.scene = self.map.scene(&self.view);
            }
            Err(error) => warn!("event=relayout_rejected error={error}"),
        }
    }
}
