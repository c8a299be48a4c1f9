//! Running the work/break cycle, with or without the terminal interface.

use std::sync::Arc;

use chrono::Local;

use crate::cli::args::OutputFormat;
use crate::config::{Paths, SettingsStore};
use crate::engine::LocalEngine;
use crate::error::EyesBreakError;
use crate::features::effects::{CommandPlayer, DesktopNotifier, HeadlessShell, Shell};
use crate::features::session::{AppContext, SessionController, SessionState};
use crate::output::format_view;
use crate::tui::{self, TerminalShell};

fn context(
    paths: &Paths,
    store: &SettingsStore,
    engine: &LocalEngine,
    shell: Arc<dyn Shell>,
) -> AppContext {
    AppContext::new(
        store.handle(),
        Arc::new(engine.clone()),
        Arc::new(DesktopNotifier::new()),
        Arc::new(CommandPlayer::new(&paths.sounds)),
        shell,
    )
}

/// Run the cycle until the user quits.
///
/// # Errors
///
/// Returns an error if the runtime or the terminal cannot be set up.
pub fn session(
    paths: &Paths,
    store: SettingsStore,
    headless: bool,
    format: OutputFormat,
) -> Result<(), EyesBreakError> {
    store.load();
    let runtime = tokio::runtime::Runtime::new()?;

    if headless {
        runtime.block_on(run_headless(paths, &store, format))
    } else {
        runtime.block_on(run_tui(paths, &store))
    }
}

async fn run_tui(paths: &Paths, store: &SettingsStore) -> Result<(), EyesBreakError> {
    let engine = LocalEngine::new();
    let shell = Arc::new(TerminalShell::new());
    let (controller, handle) = SessionController::new(context(paths, store, &engine, shell.clone()));
    let task = tokio::spawn(controller.run());

    let result = tui::run(handle.clone(), store, &shell, engine.exit_requested()).await;

    handle.shutdown();
    if let Err(e) = task.await {
        tracing::error!(error = %e, "session controller panicked");
    }
    result
}

async fn run_headless(
    paths: &Paths,
    store: &SettingsStore,
    format: OutputFormat,
) -> Result<(), EyesBreakError> {
    let engine = LocalEngine::new();
    let (controller, handle) =
        SessionController::new(context(paths, store, &engine, Arc::new(HeadlessShell)));
    let mut views = handle.subscribe();
    let task = tokio::spawn(controller.run());

    handle.toggle();
    tracing::info!("running headless, press Ctrl-C to stop");

    let ctrl_c = tokio::signal::ctrl_c();
    let exit = engine.exit_requested();
    tokio::pin!(ctrl_c, exit);

    let mut last_state: Option<SessionState> = None;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
            () = &mut exit => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if last_state != Some(view.state) {
                    last_state = Some(view.state);
                    println!("{}", format_view(&view, Local::now(), format)?);
                }
            }
        }
    }

    handle.shutdown();
    if let Err(e) = task.await {
        tracing::error!(error = %e, "session controller panicked");
    }
    Ok(())
}
