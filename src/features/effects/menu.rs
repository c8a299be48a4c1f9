use std::fmt;

/// Actions reachable from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Ask the engine to shut the application down.
    Quit,
    /// Hide the application.
    Hide,
    /// Bring the application back.
    Show,
}

impl MenuAction {
    /// Stable menu item id.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Hide => "hide",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One entry of the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    /// Key that triggers the item on the terminal surface.
    pub key: char,
}

/// The tray menu, top to bottom.
#[must_use]
pub fn tray_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            action: MenuAction::Quit,
            label: "Quit",
            key: 'q',
        },
        MenuItem {
            action: MenuAction::Hide,
            label: "Hide",
            key: 'h',
        },
        MenuItem {
            action: MenuAction::Show,
            label: "Show",
            key: 'v',
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tray_menu_order() {
        let actions: Vec<_> = tray_menu().iter().map(|item| item.action).collect();
        assert_eq!(
            actions,
            vec![MenuAction::Quit, MenuAction::Hide, MenuAction::Show]
        );
    }

    #[test]
    fn test_menu_keys_are_unique() {
        let menu = tray_menu();
        for (i, item) in menu.iter().enumerate() {
            assert!(menu[i + 1..].iter().all(|other| other.key != item.key));
        }
    }
}
