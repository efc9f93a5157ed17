use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, Context};

use crate::config::{EngineConfig, ViewConfig};
use crate::entities::{
    EntityGraph, ExtractionClient, FileSource, GraphSnapshot, GraphSource, HttpSource, PollOutcome,
    RetryPolicy, poll_for_graph,
};

mod frame_loop;
mod graph;
mod physics;
mod render_utils;
mod selection;
mod transform;
mod ui;

use frame_loop::FrameLoop;
use graph::interaction::InteractionController;
use graph::view::FrameStats;
use physics::Simulator;
use selection::SelectionState;
use transform::{Surface, ViewTransform};

const LOAD_POLL_REPAINT: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub enum GraphOrigin {
    File(PathBuf),
    Remote {
        client: ExtractionClient,
        document_id: String,
    },
}

impl GraphOrigin {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Remote { document_id, .. } => document_id.clone(),
        }
    }

    fn supports_extraction(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

pub struct GraphApp {
    config: EngineConfig,
    origin: GraphOrigin,
    state: AppState,
    pending: Option<LoadHandle>,
}

enum AppState {
    Loading {
        handle: LoadHandle,
        message: &'static str,
    },
    Empty {
        note: Option<String>,
    },
    Ready(Box<GraphView>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadKind {
    Fetch,
    Extract { reextract: bool },
}

#[derive(Debug)]
enum LoadReport {
    Graph(EntityGraph),
    Empty,
    GaveUp { attempts: u32 },
    Cancelled,
}

/// A background load. Dropping it raises the cancel flag so the worker stops
/// polling at its next check.
struct LoadHandle {
    rx: Receiver<Result<LoadReport, String>>,
    cancel: Arc<AtomicBool>,
}

impl LoadHandle {
    fn try_take(&self) -> Option<Result<LoadReport, String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err("Background load worker disconnected".to_owned()))
            }
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HostAction {
    Reload,
    Reextract,
}

struct GraphView {
    graph: EntityGraph,
    simulator: Simulator,
    view: ViewTransform,
    selection: SelectionState,
    config: ViewConfig,
    interaction: InteractionController,
    frame_loop: FrameLoop,
    surface: Option<Surface>,
    pointer_inside: bool,
    last_frame: Option<FrameStats>,
    search: String,
}

impl GraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EngineConfig, origin: GraphOrigin) -> Self {
        let handle = Self::spawn_load(&config, &origin, LoadKind::Fetch);
        Self {
            config,
            origin,
            state: AppState::Loading {
                handle,
                message: "Loading entity graph...",
            },
            pending: None,
        }
    }

    fn spawn_load(config: &EngineConfig, origin: &GraphOrigin, kind: LoadKind) -> LoadHandle {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let origin = origin.clone();
        let policy = RetryPolicy::new(
            config.extraction.poll_interval(),
            config.extraction.timeout(),
        );
        let worker_cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            let result = run_load(&origin, kind, policy, &worker_cancel)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        LoadHandle { rx, cancel }
    }

    fn start_load(config: &EngineConfig, origin: &GraphOrigin, kind: LoadKind) -> AppState {
        let message = match kind {
            LoadKind::Fetch => "Loading entity graph...",
            LoadKind::Extract { .. } => "Extracting entities...",
        };
        AppState::Loading {
            handle: Self::spawn_load(config, origin, kind),
            message,
        }
    }
}

/// State to move to once a load finishes. A cancelled load changes nothing.
fn settle(config: &EngineConfig, result: Result<LoadReport, String>) -> Option<AppState> {
    match result {
        Ok(LoadReport::Graph(graph)) => Some(AppState::Ready(Box::new(GraphView::new(graph, config)))),
        Ok(LoadReport::Empty) => Some(AppState::Empty { note: None }),
        Ok(LoadReport::GaveUp { attempts }) => Some(AppState::Empty {
            note: Some(format!(
                "Entities were not available after {attempts} attempts. Extraction may still be running."
            )),
        }),
        Ok(LoadReport::Cancelled) => None,
        Err(error) => Some(AppState::Error(error)),
    }
}

fn run_load(
    origin: &GraphOrigin,
    kind: LoadKind,
    policy: RetryPolicy,
    cancel: &AtomicBool,
) -> Result<LoadReport> {
    match (origin, kind) {
        (GraphOrigin::File(path), _) => {
            let snapshot = FileSource::new(path.clone()).fetch()?;
            build_report(snapshot)
        }
        (GraphOrigin::Remote { client, document_id }, LoadKind::Fetch) => {
            let snapshot = client.fetch_graph(document_id)?;
            build_report(snapshot)
        }
        (GraphOrigin::Remote { client, document_id }, LoadKind::Extract { reextract }) => {
            if reextract {
                client.trigger_reextraction(document_id)?;
            } else {
                client.trigger_extraction(document_id)?;
            }

            let mut source = HttpSource::new(client.clone(), document_id.clone());
            match poll_for_graph(&mut source, policy, cancel) {
                PollOutcome::Ready(snapshot) => build_report(snapshot),
                PollOutcome::GaveUp { attempts } => Ok(LoadReport::GaveUp { attempts }),
                PollOutcome::Cancelled => Ok(LoadReport::Cancelled),
            }
        }
    }
}

fn build_report(snapshot: GraphSnapshot) -> Result<LoadReport> {
    if !snapshot.has_nodes() {
        tracing::info!("graph has no entities yet");
        return Ok(LoadReport::Empty);
    }

    let graph = EntityGraph::from_snapshot(snapshot)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "entity graph loaded"
    );
    Ok(LoadReport::Graph(graph))
}

impl eframe::App for GraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let can_extract = self.origin.supports_extraction();

        match &mut self.state {
            AppState::Loading { handle, message } => {
                if let Some(result) = handle.try_take() {
                    transition =
                        Some(settle(&self.config, result).unwrap_or(AppState::Empty { note: None }));
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(*message);
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint_after(LOAD_POLL_REPAINT);
            }
            AppState::Empty { note } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("No entities extracted yet");
                        ui.label(self.origin.describe());
                        if let Some(note) = note {
                            ui.add_space(6.0);
                            ui.label(note.as_str());
                        }
                        ui.add_space(10.0);
                        if can_extract && ui.button("Extract entities").clicked() {
                            transition = Some(Self::start_load(
                                &self.config,
                                &self.origin,
                                LoadKind::Extract { reextract: false },
                            ));
                        }
                        if ui.button("Reload").clicked() {
                            transition = Some(Self::start_load(
                                &self.config,
                                &self.origin,
                                LoadKind::Fetch,
                            ));
                        }
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the entity graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition =
                            Some(Self::start_load(&self.config, &self.origin, LoadKind::Fetch));
                    }
                });
            }
            AppState::Ready(view) => {
                let is_loading = self.pending.is_some();
                let action = view.show(ctx, &self.origin.describe(), is_loading, can_extract);

                if self.pending.is_none() {
                    self.pending = match action {
                        Some(HostAction::Reload) => {
                            Some(Self::spawn_load(&self.config, &self.origin, LoadKind::Fetch))
                        }
                        Some(HostAction::Reextract) if can_extract => Some(Self::spawn_load(
                            &self.config,
                            &self.origin,
                            LoadKind::Extract { reextract: true },
                        )),
                        _ => None,
                    };
                }

                if let Some(handle) = self.pending.take() {
                    match handle.try_take() {
                        Some(result) => transition = settle(&self.config, result),
                        None => {
                            self.pending = Some(handle);
                            ctx.request_repaint_after(LOAD_POLL_REPAINT);
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.pending = None;
            self.state = next_state;
        }
    }
}
