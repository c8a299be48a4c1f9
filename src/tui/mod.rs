//! Terminal User Interface (TUI) for eyes-break.
//!
//! Shows the session screen, the settings editor and a one-line view while
//! hidden. Built with ratatui and crossterm.

mod app;
mod event;
mod shell;
mod ui;

pub use app::App;
pub use event::{handle_key, Action};
pub use shell::TerminalShell;

use std::future::Future;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;

use crate::config::SettingsStore;
use crate::error::EyesBreakError;
use crate::features::session::ControllerHandle;

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Run the TUI until the user quits or `exit` resolves.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or draw.
pub async fn run(
    handle: ControllerHandle,
    store: &SettingsStore,
    shell: &TerminalShell,
    exit: impl Future<Output = ()>,
) -> Result<(), EyesBreakError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| EyesBreakError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| EyesBreakError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| EyesBreakError::Terminal(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(store);
    let result = run_app(&mut terminal, &mut app, &handle, shell, exit).await;

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_>,
    handle: &ControllerHandle,
    shell: &TerminalShell,
    exit: impl Future<Output = ()>,
) -> Result<(), EyesBreakError> {
    let mut views = handle.subscribe();
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    tokio::pin!(exit);

    loop {
        let view = views.borrow_and_update().clone();
        terminal
            .draw(|frame| ui::render(frame, app, &view, shell.is_visible(), &shell.menu()))
            .map_err(|e| EyesBreakError::Terminal(format!("Failed to draw: {e}")))?;

        tokio::select! {
            () = &mut exit => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = redraw.tick() => {}
            next = events.next() => match next {
                Some(Ok(Event::Key(key))) => {
                    let Some(action) = event::handle_key(app, &view, key) else {
                        continue;
                    };
                    let delivered = match action {
                        Action::Quit => break,
                        Action::Toggle => handle.toggle(),
                        Action::ShowSettings => handle.show_settings(),
                        Action::CloseSettings => handle.close_settings(),
                        Action::Menu(item) => handle.menu(item),
                    };
                    if !delivered {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(EyesBreakError::Terminal(format!("Failed to read events: {e}")));
                }
                None => break,
            },
        }
    }

    Ok(())
}
