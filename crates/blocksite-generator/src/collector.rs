//! Content collection and organization.
//!
//! Reads the page records exported from the CMS (`<content_dir>/pages/*.json`)
//! and indexes them by locale and slug.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use blocksite_core::{Config, Locales, LocalizedPage, PageRecord, url};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory of page records, relative to the content dir.
pub const PAGES_DIR: &str = "pages";

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record parse error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Route parameters of one localized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub locale: String,
    /// Slug segments; `None` for the homepage.
    pub slug: Option<Vec<String>>,
}

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// Page records in file path order.
    pub records: Vec<PageRecord>,

    /// Localized pages indexed by `(locale, slug)`.
    pub pages: BTreeMap<(String, String), LocalizedPage>,

    /// Files that could not be parsed.
    pub failed: Vec<CollectorError>,
}

impl SiteContent {
    /// Build the index from records, keeping only configured locales.
    pub fn from_records(records: Vec<PageRecord>, locales: &Locales) -> Self {
        let mut pages = BTreeMap::new();

        for record in &records {
            for locale in record.locales.keys() {
                if !locales.has_locale(locale) {
                    warn!(record = %record.id, locale, "dropping unconfigured locale");
                    continue;
                }
                if let Some(page) = record.localized(locale) {
                    let key = (page.locale.clone(), page.slug.clone());
                    if let Some(previous) = pages.insert(key, page) {
                        warn!(
                            record = %record.id,
                            other = %previous.record_id,
                            locale,
                            "duplicate slug, keeping the later record"
                        );
                    }
                }
            }
        }

        Self {
            records,
            pages,
            failed: Vec::new(),
        }
    }

    /// Look a page up by locale and slug.
    pub fn find(&self, locale: &str, slug: &str) -> Option<&LocalizedPage> {
        self.pages.get(&(locale.to_string(), slug.to_string()))
    }

    /// Look a page up from route parameters.
    pub fn find_route(&self, params: &RouteParams) -> Option<&LocalizedPage> {
        let slug = params.slug.as_deref().map(url::build_slug).unwrap_or_default();
        self.find(&params.locale, &slug)
    }

    /// Route parameters of every localized page.
    pub fn static_params(&self) -> Vec<RouteParams> {
        self.pages
            .values()
            .map(|page| RouteParams {
                locale: page.locale.clone(),
                slug: url::split_slug(&page.slug),
            })
            .collect()
    }

    /// Localized pages of one record, keyed by locale.
    pub fn translations(&self, record_id: &str) -> BTreeMap<&str, &LocalizedPage> {
        self.pages
            .values()
            .filter(|page| page.record_id == record_id)
            .map(|page| (page.locale.as_str(), page))
            .collect()
    }

    /// Iterate over every localized page.
    pub fn iter(&self) -> impl Iterator<Item = &LocalizedPage> {
        self.pages.values()
    }

    /// Number of localized pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Content collector that reads page records.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
        }
    }

    /// Collect all page records from the content directory.
    ///
    /// Unparseable files are logged and listed in [`SiteContent::failed`].
    pub fn collect(&self) -> Result<SiteContent> {
        let pages_dir = self.content_dir.join(PAGES_DIR);
        info!(dir = %pages_dir.display(), "collecting content");

        let files = find_record_files(&pages_dir)?;
        info!(count = files.len(), "found page records");

        let parsed: Vec<_> = files
            .par_iter()
            .map(|path| {
                debug!(path = %path.display(), "parsing record");
                PageRecord::load(path).map_err(|e| CollectorError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })
            })
            .collect();

        let mut records = Vec::new();
        let mut failed = Vec::new();
        for result in parsed {
            match result {
                Ok(record) if record.draft && !self.config.build.drafts => {
                    debug!(record = %record.id, "skipping draft");
                }
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "failed to parse record");
                    failed.push(e);
                }
            }
        }

        let mut content = SiteContent::from_records(records, &Locales::from_config(&self.config));
        content.failed = failed;

        info!(
            records = content.records.len(),
            pages = content.len(),
            failed = content.failed.len(),
            "content collection complete"
        );

        Ok(content)
    }
}

/// JSON files directly in `dir`, sorted by path. A missing dir has none.
fn find_record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if path.is_file() && !hidden && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
