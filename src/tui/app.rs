//! Application state for the TUI.
//!
//! The session itself lives in the controller; this only holds what the
//! terminal needs on top of it: the settings editor and a status line.

use crate::config::{FieldError, Language, SettingKey, SettingsDraft, SettingsStore};
use crate::features::i18n::Translator;

/// Application state.
pub struct App<'a> {
    store: &'a SettingsStore,
    pub translator: Translator,
    /// Selected settings field.
    pub selected: usize,
    /// Text being typed into the selected field.
    pub editing: Option<String>,
    /// Last rejected edit.
    pub error: Option<(SettingKey, FieldError)>,
    /// Status message to display.
    pub status: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(store: &'a SettingsStore) -> Self {
        Self {
            translator: Translator::new(store.handle()),
            store,
            selected: 0,
            editing: None,
            error: None,
            status: Some("Press ? for help".to_string()),
        }
    }

    /// The selected settings field.
    #[must_use]
    pub fn selected_key(&self) -> SettingKey {
        SettingKey::ALL[self.selected % SettingKey::ALL.len()]
    }

    /// Current value of a field.
    #[must_use]
    pub fn value_of(&self, key: SettingKey) -> String {
        key.read(&self.store.current())
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected < SettingKey::ALL.len() - 1 {
            self.selected += 1;
        }
    }

    /// Act on the selected field: switches flip, the language cycles, and
    /// everything else opens for typing.
    pub fn activate_selected(&mut self) {
        let key = self.selected_key();
        if key.is_toggle() {
            let flipped = !matches!(self.value_of(key).as_str(), "true");
            self.commit(key, flipped.to_string());
        } else if key == SettingKey::Language {
            let current = Language::from_code(&self.value_of(key)).unwrap_or_default();
            let next = Language::ALL
                .into_iter()
                .cycle()
                .skip_while(|lang| *lang != current)
                .nth(1)
                .unwrap_or_default();
            self.commit(key, next.code().to_string());
        } else {
            self.editing = Some(self.value_of(key));
            self.error = None;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.pop();
        }
    }

    /// Validate and save the text being typed.
    pub fn commit_edit(&mut self) {
        if let Some(raw) = self.editing.take() {
            let key = self.selected_key();
            self.commit(key, raw);
        }
    }

    /// Drop the text being typed.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    fn commit(&mut self, key: SettingKey, raw: String) {
        let draft = SettingsDraft::new().set(key, raw.clone());
        match draft.apply(&self.store.current()) {
            Ok(updated) => match self.store.save(updated) {
                Ok(()) => {
                    self.error = None;
                    self.status = Some(format!("Saved {key}"));
                },
                Err(e) => self.status = Some(e.to_string()),
            },
            Err(errors) => {
                self.error = errors.into_iter().next();
                self.editing = Some(raw);
            },
        }
    }
}
