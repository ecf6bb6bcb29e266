/// Headless command-line driver for the quill-pad editing core.
mod script;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use quill_pad_config::{config_path, AppConfig};
use quill_pad_core::{
    doc_id_for_path, generate_unsaved_id, Document, HistoryConfig, PersistenceLayer,
};

use crate::script::Runner;

#[derive(Parser, Debug)]
#[command(
    name = "quill-pad",
    version,
    about = "Scriptable text-editing core with undo history and table composition"
)]
struct Cli {
    /// Script file to execute; reads from stdin when omitted.
    script: Option<PathBuf>,

    /// Persist undo history under this directory instead of in memory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Initial buffer content.
    #[arg(long, default_value = "")]
    text: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_create(&config_path());

    let mut doc = open_document(&cli, &config)?;
    if !cli.text.is_empty() {
        doc.set_buffer_text(&cli.text);
    }

    let source = match &cli.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };

    let mut runner = Runner::new(doc, &config);
    runner.run(&source)?;

    runner
        .into_document()
        .flush_history()
        .context("Failed to flush undo history")?;
    Ok(())
}

/// Opens the working document, wiring up persisted history when a data
/// directory was given and restore is enabled.
fn open_document(cli: &Cli, config: &AppConfig) -> Result<Document> {
    let Some(data_dir) = &cli.data_dir else {
        return Ok(Document::new());
    };
    if !config.restore_history {
        tracing::debug!("history restore disabled, keeping history in memory");
        return Ok(Document::new());
    }

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let persistence = PersistenceLayer::open(data_dir)
        .with_context(|| format!("Failed to open history store in {}", data_dir.display()))?;

    // A script file gets a stable ID so its history survives reruns.
    let doc_id = match &cli.script {
        Some(path) => doc_id_for_path(path),
        None => generate_unsaved_id(),
    };
    let history_config = HistoryConfig {
        max_history_depth: config.max_history_depth,
        data_dir: data_dir.clone(),
    };
    Document::with_persistence(doc_id, history_config, persistence)
}
