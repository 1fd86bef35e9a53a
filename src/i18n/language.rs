//! Language type: a code validated against the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};

/// A validated UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const CZECH: Language = Language { code: "cs" };
    pub const VIETNAMESE: Language = Language { code: "vi" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The fallback language used when nothing else is chosen.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// Language built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn strings(&self) -> &'static LanguageStrings {
        self.config().strings
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}
