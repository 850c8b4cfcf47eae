//! Watch command - development server with live reload

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use blocksite_core::Config;
use blocksite_generator::{BuildStats, Builder};
use color_eyre::eyre::{Result, WrapErr};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::{net::TcpListener, sync::mpsc};

use super::{build::print_stats, check::quick_validate};
use crate::server::{LIVERELOAD_PATH, LIVERELOAD_SCRIPT, ReloadMessage, ServerState, create_router};

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Run the watch command.
///
/// Starts a development server with live reload support.
pub async fn run(config_path: &Path, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, "Starting watch mode");

    let mut config = crate::load_config(config_path).wrap_err("Failed to load configuration")?;

    let warnings = quick_validate(&config);
    if !warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warn in &warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    // Drafts are previewed in development.
    config.build.drafts = true;

    let output_dir = PathBuf::from(&config.build.output_dir);

    tracing::info!("Running initial build...");
    let stats = build_with_livereload(&config)?;
    print_stats(&stats);

    let state = Arc::new(ServerState::new());

    let (tx, mut rx) = mpsc::channel::<ReloadMessage>(16);
    let static_dir = PathBuf::from(&config.build.static_dir);
    // Watcher events carry absolute paths.
    let watcher_static_dir = fs::canonicalize(&static_dir).unwrap_or_else(|_| static_dir.clone());

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_))
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                )
            {
                let _ = tx.blocking_send(classify(&event.paths, &watcher_static_dir));
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for dir in [
        config.content_dir(),
        config.templates_dir(),
        config.messages_dir(),
        static_dir,
    ] {
        if dir.exists() {
            watcher
                .watch(&dir, RecursiveMode::Recursive)
                .wrap_err_with(|| format!("Failed to watch {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), "Watching directory");
        }
    }

    let rebuild_state = state.clone();
    let rebuild_config = config.clone();

    tokio::spawn(async move {
        let mut last_rebuild = Instant::now();

        while let Some(mut message) = rx.recv().await {
            if last_rebuild.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
                continue;
            }

            // Drain queued events; any non-CSS change forces a full reload.
            while let Ok(queued) = rx.try_recv() {
                if queued == ReloadMessage::Reload {
                    message = ReloadMessage::Reload;
                }
            }

            println!();
            println!("  File change detected, rebuilding...");

            match build_with_livereload(&rebuild_config) {
                Ok(stats) => {
                    println!("  ✓ Rebuilt {} pages in {}ms", stats.pages, stats.duration_ms);
                    rebuild_state.notify(message);
                }
                Err(e) => {
                    tracing::error!("Rebuild failed: {e}");
                    eprintln!("  ✗ Rebuild failed: {e}");
                }
            }

            last_rebuild = Instant::now();
        }
    });

    let app = create_router(&output_dir, &config.i18n.locales, state);
    let addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser {
        let _ = open::that(format!("http://{addr}"));
    }

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Stylesheet edits under the static dir only need a CSS refresh.
fn classify(paths: &[PathBuf], static_dir: &Path) -> ReloadMessage {
    let css_only = !paths.is_empty()
        && paths.iter().all(|path| {
            path.starts_with(static_dir) && path.extension().is_some_and(|ext| ext == "css")
        });

    if css_only {
        ReloadMessage::CssReload
    } else {
        ReloadMessage::Reload
    }
}

/// Build the site, then inject the live reload script into its pages.
///
/// A fresh builder per build so edited block templates are reloaded.
fn build_with_livereload(config: &Config) -> Result<BuildStats> {
    let builder = Builder::from_config(config.clone());
    let stats = builder.build().wrap_err("Build failed")?;

    inject_livereload(builder.output_dir())?;

    tracing::debug!(?stats, "Build completed");
    Ok(stats)
}

/// Inject the live reload script into all HTML files under `output_dir`.
fn inject_livereload(output_dir: &Path) -> Result<usize> {
    let mut injected = 0;

    for entry in walkdir::WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
    {
        let path = entry.path();
        let content = fs::read_to_string(path)?;

        if !content.contains(LIVERELOAD_PATH) && content.contains("</body>") {
            let modified = content.replace("</body>", &format!("{LIVERELOAD_SCRIPT}</body>"));
            fs::write(path, modified)?;
            injected += 1;
        }
    }

    Ok(injected)
}
