//! Interface strings.
//!
//! Catalogs are embedded YAML files, flattened to dotted keys
//! (`home.messages.work`). Lookups follow the live `language` setting and
//! fall back to English, then to the key itself.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_yaml::Value;

use crate::config::{Language, SettingsHandle};

type Catalog = HashMap<String, String>;

static CATALOGS: Lazy<HashMap<Language, Catalog>> = Lazy::new(|| {
    Language::ALL
        .into_iter()
        .map(|lang| (lang, load_catalog(lang)))
        .collect()
});

const fn source(lang: Language) -> &'static str {
    match lang {
        Language::En => include_str!("en.yaml"),
        Language::Es => include_str!("es.yaml"),
    }
}

fn load_catalog(lang: Language) -> Catalog {
    let mut catalog = Catalog::new();
    match serde_yaml::from_str::<Value>(source(lang)) {
        Ok(root) => flatten("", &root, &mut catalog),
        Err(e) => tracing::error!(language = %lang, error = %e, "failed to parse string catalog"),
    }
    catalog
}

fn flatten(prefix: &str, value: &Value, out: &mut Catalog) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        },
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        },
        _ => {},
    }
}

/// Resolves string keys against the current language.
#[derive(Clone)]
pub struct Translator {
    settings: SettingsHandle,
}

impl Translator {
    pub fn new(settings: SettingsHandle) -> Self {
        Self { settings }
    }

    /// Translate into the currently configured language.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        let lang = self.settings.borrow().language;
        Self::translate_in(lang, key)
    }

    /// Translate into a specific language.
    #[must_use]
    pub fn translate_in(lang: Language, key: &str) -> String {
        lookup(lang, key)
            .or_else(|| lookup(Language::En, key))
            .unwrap_or_else(|| {
                tracing::debug!(key, "missing string");
                key.to_string()
            })
    }
}

fn lookup(lang: Language, key: &str) -> Option<String> {
    CATALOGS.get(&lang)?.get(key).cloned()
}
