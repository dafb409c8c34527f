mod app;
mod project;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{AppConfig, ThemeMode, ViewTuning};
use project::{FsNoteSource, FsProjectStore};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding `<project>.json` or `<project>/graph.json`.
    #[arg(long, default_value = "projects")]
    projects_dir: PathBuf,

    #[arg(long)]
    project: String,

    /// Markdown notes as `<node id>.md`. Defaults to `<projects-dir>/<project>/notes`.
    #[arg(long)]
    notes_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ThemeMode::Dark)]
    theme: ThemeMode,

    /// Node to fly to once the layout has placed it.
    #[arg(long)]
    focus: Option<String>,

    #[arg(long, default_value_t = 2.0)]
    click_zoom: f32,

    #[arg(long, default_value_t = 1000)]
    click_duration_ms: u32,

    #[arg(long, default_value_t = 5.0)]
    focus_zoom: f32,

    #[arg(long, default_value_t = 400)]
    focus_duration_ms: u32,

    /// Zoom level above which every label is drawn.
    #[arg(long, default_value_t = 2.0)]
    label_zoom: f32,
}

impl Args {
    fn into_config(self) -> AppConfig {
        let notes_dir = self
            .notes_dir
            .unwrap_or_else(|| self.projects_dir.join(&self.project).join("notes"));

        AppConfig {
            store: Arc::new(FsProjectStore::new(self.projects_dir)),
            notes: Arc::new(FsNoteSource::new(notes_dir)),
            project_id: self.project,
            theme: self.theme,
            tuning: ViewTuning {
                click_zoom: self.click_zoom,
                click_duration_ms: self.click_duration_ms,
                focus_zoom: self.focus_zoom,
                focus_duration_ms: self.focus_duration_ms,
                label_zoom: self.label_zoom,
            },
            initial_focus: self.focus,
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Args::parse().into_config();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "concept-atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::ConceptAtlasApp::new(cc, config)))),
    )
}
