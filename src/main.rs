use std::{
    io,
    path::{Path, PathBuf},
    sync::Once,
};

use anyhow::{anyhow, Context};
use clap::Parser;
use crossterm::terminal;
use rowedit::{terminal::TerminalGuard, Buffer, Editor, EditorConfig, EditorError, EditorState};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rowedit", version, about = "A minimal terminal line editor")]
struct Args {
    /// File to open. Starts with an empty buffer when omitted.
    path: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default `info`).
    #[arg(long = "log")]
    log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log.as_deref())?;
    install_panic_hook();

    let config = EditorConfig::default();
    let (cols, rows) = terminal::size()?;
    let mut state = EditorState::new(config, rows.into(), cols.into());
    state.set_status(state.config.help_message.clone());

    if let Some(path) = args.path {
        match Buffer::open(&path) {
            Ok(buffer) => state.load(buffer, Some(path)),
            Err(EditorError::FileNotFound(_)) => {
                tracing::warn!(target: "io", file = %path.display(), "file_not_found");
                state.load(Buffer::new(), Some(path));
                state.set_status("New file");
            }
            Err(e) => return Err(e).with_context(|| format!("opening {}", path.display())),
        }
    }

    tracing::info!(
        target: "runtime.startup",
        rows,
        cols,
        file = ?state.filename(),
        lines = state.buffer.len(),
        "startup"
    );

    let guard = TerminalGuard::enter()?;
    let mut editor = Editor::new(state, io::stdin().lock(), io::stdout());
    let result = editor.run();
    drop(guard);

    if let Err(e) = &result {
        tracing::error!(target: "runtime", error = %e, "fatal");
    }
    result
}

fn configure_logging(path: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().context("log path has no file name")?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(Some(guard))
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", %info, "panic");
            default_panic(info);
        }));
    });
}
