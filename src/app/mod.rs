use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{debug, info, warn};

use crate::project::{GraphDocument, NoteSource, ProjectStore};

mod camera;
mod focus;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod search;
mod theme;
mod transition;
mod ui;

pub use graph::ViewTuning;
pub use theme::ThemeMode;

use focus::FocusRequest;
use graph::{GraphModel, GraphView};
use search::SearchState;
use ui::FrameRate;

type LoadResult = Result<GraphDocument, String>;

pub struct AppConfig {
    pub project_id: String,
    pub store: Arc<dyn ProjectStore>,
    pub notes: Arc<dyn NoteSource>,
    pub theme: ThemeMode,
    pub tuning: ViewTuning,
    pub initial_focus: Option<String>,
}

pub struct ConceptAtlasApp {
    config: AppConfig,
    theme: ThemeMode,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct NoteReply {
    generation: u64,
    node_id: String,
    result: Result<String, String>,
}

enum NoteContent {
    Idle,
    Loading,
    Loaded(String),
    Unavailable(String),
}

struct ViewModel {
    project_id: String,
    graph: GraphView,
    search: SearchState,
    selected: Option<String>,
    notes: Arc<dyn NoteSource>,
    note_generation: u64,
    note_tx: Sender<NoteReply>,
    note_rx: Receiver<NoteReply>,
    note: NoteContent,
    focus_ack_tx: Sender<String>,
    focus_ack_rx: Receiver<String>,
    pending_focus_label: Option<String>,
    last_focused: Option<String>,
    frame_rate: FrameRate,
}

impl ConceptAtlasApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        cc.egui_ctx.set_visuals(config.theme.visuals());
        let state = Self::start_load(&config);
        Self {
            theme: config.theme,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(config: &AppConfig) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let project_id = config.project_id.clone();
        let store = Arc::clone(&config.store);
        info!(project = %project_id, "loading project");

        thread::spawn(move || {
            let result = store
                .fetch_document(&project_id)
                .map_err(|error| format!("{error:#}"));
            match &result {
                Ok(document) => {
                    info!(project = %project_id, nodes = document.nodes.len(), "project loaded")
                }
                Err(error) => warn!(project = %project_id, %error, "project load failed"),
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: &AppConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config),
        }
    }

    fn ready_state(&self, result: LoadResult) -> AppState {
        match result {
            Ok(document) => AppState::Ready(Box::new(ViewModel::new(&self.config, &document))),
            Err(error) => AppState::Error(error),
        }
    }
}

impl eframe::App for ConceptAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading project {}...", self.config.project_id));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading(format!("Failed to load project {}", self.config.project_id));
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut self.theme, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.config));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            ctx.request_repaint();
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(&self.config);
            return;
        }

        if let Some(result) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.graph.teardown();
            }
            self.reload_rx = None;
            self.state = self.ready_state(result);
        }
    }
}

impl ViewModel {
    fn new(config: &AppConfig, document: &GraphDocument) -> Self {
        let model = GraphModel::build(document);
        info!(
            project = %config.project_id,
            nodes = model.nodes.len(),
            links = model.edges.len(),
            "graph built"
        );
        if model.dangling_references > 0 {
            debug!(
                count = model.dangling_references,
                "ignored links to nodes missing from the document"
            );
        }

        let (note_tx, note_rx) = mpsc::channel();
        let (focus_ack_tx, focus_ack_rx) = mpsc::channel();
        let mut view = Self {
            project_id: config.project_id.clone(),
            graph: GraphView::new(model, config.tuning),
            search: SearchState::default(),
            selected: None,
            notes: Arc::clone(&config.notes),
            note_generation: 0,
            note_tx,
            note_rx,
            note: NoteContent::Idle,
            focus_ack_tx,
            focus_ack_rx,
            pending_focus_label: None,
            last_focused: None,
            frame_rate: FrameRate::default(),
        };

        if let Some(node_id) = &config.initial_focus {
            view.request_focus(node_id);
        }
        view
    }

    /// Queues a camera focus; the label clears once the view reports it issued.
    fn request_focus(&mut self, node_id: &str) {
        let tx = self.focus_ack_tx.clone();
        let request = FocusRequest::new(node_id).on_issued(move |id| {
            let _ = tx.send(id.to_owned());
        });
        self.pending_focus_label = Some(node_id.to_owned());
        self.graph.request_focus(request);
    }

    fn poll_focus_acks(&mut self) {
        while let Ok(node_id) = self.focus_ack_rx.try_recv() {
            if self.pending_focus_label.as_deref() == Some(node_id.as_str()) {
                self.pending_focus_label = None;
            }
            self.last_focused = Some(node_id);
        }
        if !self.graph.has_pending_focus() {
            self.pending_focus_label = None;
        }
    }

    fn set_selected(&mut self, ctx: &Context, selected: Option<String>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        self.note_generation += 1;

        let Some(node_id) = self.selected.clone() else {
            self.note = NoteContent::Idle;
            return;
        };

        self.note = NoteContent::Loading;
        let generation = self.note_generation;
        let notes = Arc::clone(&self.notes);
        let tx = self.note_tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = notes
                .fetch_note(&node_id)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(NoteReply {
                generation,
                node_id,
                result,
            });
            ctx.request_repaint();
        });
    }

    /// Selects a node and flies the camera to it, as search and note links do.
    fn select_and_focus(&mut self, ctx: &Context, node_id: &str) {
        if !self.graph.model().contains(node_id) {
            return;
        }
        self.set_selected(ctx, Some(node_id.to_owned()));
        self.request_focus(node_id);
    }

    fn poll_notes(&mut self) {
        while let Ok(reply) = self.note_rx.try_recv() {
            if reply.generation != self.note_generation {
                continue;
            }
            self.note = match reply.result {
                Ok(text) => NoteContent::Loaded(text),
                Err(error) => {
                    warn!(node = %reply.node_id, %error, "note fetch failed");
                    NoteContent::Unavailable(error)
                }
            };
        }
    }
}
