//! Language registry: Single source of truth for all supported UI languages.
//!
//! The registry is built once on first access (`OnceLock`) and never
//! mutated afterwards, so request handlers can share it freely.

use super::strings::{CZECH_STRINGS, ENGLISH_STRINGS, VIETNAMESE_STRINGS};
use super::LanguageStrings;
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "cs", "vi")
    pub code: &'static str,

    /// Native name of the language, shown in the language switcher
    pub native_name: &'static str,

    /// Whether this is the fallback language (only one should be true)
    pub is_canonical: bool,

    /// Whether this language can be selected
    pub enabled: bool,

    /// UI strings for this language
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages, in switcher order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical (fallback) language configuration.
    ///
    /// # Panics
    /// Panics if the compiled-in table does not have exactly one canonical
    /// language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// English (canonical), Czech and Vietnamese.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            native_name: "English",
            is_canonical: true,
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "cs",
            native_name: "Čeština",
            is_canonical: false,
            enabled: true,
            strings: &CZECH_STRINGS,
        },
        LanguageConfig {
            code: "vi",
            native_name: "Tiếng Việt",
            is_canonical: false,
            enabled: true,
            strings: &VIETNAMESE_STRINGS,
        },
    ]
}
