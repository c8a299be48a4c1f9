//! Window behavior of the terminal surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::features::effects::{EffectError, MenuItem, Shell};

/// Hiding collapses the interface to a single status line.
#[derive(Debug)]
pub struct TerminalShell {
    visible: AtomicBool,
    menu: Mutex<Vec<MenuItem>>,
}

impl Default for TerminalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalShell {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: AtomicBool::new(true),
            menu: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// The installed menu, empty until the controller installs it.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        self.menu
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Shell for TerminalShell {
    fn install_menu(&self, items: &[MenuItem]) -> Result<(), EffectError> {
        *self.menu.lock().unwrap_or_else(PoisonError::into_inner) = items.to_vec();
        Ok(())
    }

    fn show(&self) -> Result<(), EffectError> {
        self.visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide(&self) -> Result<(), EffectError> {
        self.visible.store(false, Ordering::SeqCst);
        Ok(())
    }
}
