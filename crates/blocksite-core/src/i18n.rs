//! Locales and translated messages.
//!
//! Message catalogues live in `<messages_dir>/<locale>.json` as nested JSON
//! namespaces and are looked up with dotted paths (`NotFoundPage.title`).

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{CoreError, Result},
};

/// Supported locales of a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    locales: Vec<String>,
    default_locale: String,
}

impl Locales {
    /// Create a locale set. `default_locale` should be one of `locales`.
    pub fn new(locales: Vec<String>, default_locale: impl Into<String>) -> Self {
        Self {
            locales,
            default_locale: default_locale.into(),
        }
    }

    /// Locales configured for a site.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.i18n.locales.clone(),
            config.i18n.default_locale.clone(),
        )
    }

    /// Whether `locale` is supported.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// All supported locales.
    pub fn all(&self) -> &[String] {
        &self.locales
    }

    /// The default locale.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

/// Built-in English messages for the header and the error pages.
const BUILTIN_EN: &str = r#"{
    "Header": {
        "guide": "Guide"
    },
    "NotFoundPage": {
        "title": "404",
        "message": "This page could not be found.",
        "cta": "Back to home"
    },
    "Error": {
        "title": "Something went wrong",
        "message": "An unexpected error occurred. Please try again.",
        "retry": "Try again"
    }
}"#;

/// Built-in French messages for the header and the error pages.
const BUILTIN_FR: &str = r#"{
    "Header": {
        "guide": "Guide"
    },
    "NotFoundPage": {
        "title": "404",
        "message": "Cette page est introuvable.",
        "cta": "Retour à l'accueil"
    },
    "Error": {
        "title": "Une erreur est survenue",
        "message": "Une erreur inattendue s'est produite. Veuillez réessayer.",
        "retry": "Réessayer"
    }
}"#;

/// Translated messages for one locale.
#[derive(Debug, Clone)]
pub struct Messages {
    locale: String,
    catalogues: Vec<Value>,
}

impl Messages {
    /// Messages made of the built-in catalogue only.
    pub fn builtin(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            catalogues: vec![builtin_catalogue(locale)],
        }
    }

    /// Load the catalogue of `locale`, falling back to the default locale's
    /// catalogue and then to the built-in one.
    ///
    /// Missing files are not an error; an unreadable or non-object file is.
    pub fn load(dir: &Path, locale: &str, default_locale: &str) -> Result<Self> {
        let mut catalogues = Vec::new();

        if let Some(catalogue) = load_catalogue(dir, locale)? {
            catalogues.push(catalogue);
        } else {
            warn!(locale, dir = %dir.display(), "no message catalogue for locale");
        }

        if locale != default_locale
            && let Some(catalogue) = load_catalogue(dir, default_locale)?
        {
            catalogues.push(catalogue);
        }

        catalogues.push(builtin_catalogue(locale));

        Ok(Self {
            locale: locale.to_string(),
            catalogues,
        })
    }

    /// The locale of these messages.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up a message by dotted path, if any catalogue has it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.catalogues
            .iter()
            .find_map(|catalogue| lookup(catalogue, key))
    }

    /// Translate a message; unknown keys translate to themselves.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }
}

fn load_catalogue(dir: &Path, locale: &str) -> Result<Option<Value>> {
    let path = dir.join(format!("{locale}.json"));
    if !path.exists() {
        return Ok(None);
    }

    debug!(path = %path.display(), "loading messages");
    let raw = std::fs::read_to_string(&path)?;
    let value: Value =
        serde_json::from_str(&raw).map_err(|e| CoreError::messages(&path, e.to_string()))?;

    if !value.is_object() {
        return Err(CoreError::messages(&path, "catalogue must be a JSON object"));
    }

    Ok(Some(value))
}

fn builtin_catalogue(locale: &str) -> Value {
    let raw = if locale == "fr" { BUILTIN_FR } else { BUILTIN_EN };
    serde_json::from_str(raw).unwrap_or(Value::Null)
}

fn lookup<'a>(catalogue: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(catalogue, |node, part| node.get(part))
        .and_then(Value::as_str)
}
