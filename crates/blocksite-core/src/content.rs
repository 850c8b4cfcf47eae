//! Content types exported from the CMS.

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Key of the block identifier.
pub const ID_KEY: &str = "id";

/// Key of the block type tag, as emitted by the CMS.
pub const TYPE_TAG_KEY: &str = "__typename";

/// A CMS content block.
///
/// `id` and `type_tag` are always present. The remaining fields exist only
/// when the CMS query fetched the block's fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Identifier, unique within a block list.
    pub id: String,

    /// CMS type discriminator (e.g. `VideoBlockRecord`).
    #[serde(rename = "__typename", alias = "typeTag")]
    pub type_tag: String,

    /// Every other field of the block.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentBlock {
    /// Create a block without any data fields.
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            fields: Map::new(),
        }
    }

    /// Add a data field. The reserved keys `id` and `__typename` are ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != ID_KEY && key != TYPE_TAG_KEY {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Get a data field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a data field as a string slice.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// All keys of the block, including `id` and `__typename`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        [ID_KEY, TYPE_TAG_KEY]
            .into_iter()
            .chain(self.fields.keys().map(String::as_str))
    }
}

/// A page record exported from the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Record identifier.
    pub id: String,

    /// Last update of the record.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Whether the record is unpublished.
    #[serde(default)]
    pub draft: bool,

    /// Localized versions keyed by locale.
    #[serde(default)]
    pub locales: BTreeMap<String, LocalizedContent>,
}

/// One locale of a page record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedContent {
    /// URL slug; empty for the homepage.
    #[serde(default)]
    pub slug: String,

    /// SEO title.
    #[serde(default)]
    pub title: Option<String>,

    /// SEO description.
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered content blocks.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// A page record resolved to a single locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedPage {
    pub record_id: String,
    pub locale: String,
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub content: Vec<ContentBlock>,
}

impl PageRecord {
    /// Load a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|e| CoreError::record(path, e.to_string()))
    }

    /// Parse a record from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `(locale, slug)` pairs of this record.
    pub fn slug_locales(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locales
            .iter()
            .map(|(locale, content)| (locale.as_str(), content.slug.as_str()))
    }

    /// Resolve the record to one locale.
    pub fn localized(&self, locale: &str) -> Option<LocalizedPage> {
        let content = self.locales.get(locale)?;
        Some(LocalizedPage {
            record_id: self.id.clone(),
            locale: locale.to_string(),
            slug: content.slug.clone(),
            title: content.title.clone(),
            description: content.description.clone(),
            updated_at: self.updated_at,
            content: content.content.clone(),
        })
    }
}

impl LocalizedPage {
    /// Whether this is the homepage of its locale.
    pub fn is_home(&self) -> bool {
        self.slug.is_empty()
    }
}
