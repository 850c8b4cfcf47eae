//! Lighthouse CI inputs.
//!
//! Produces the URL list audited in CI and the desktop and mobile
//! `lighthouserc` files, both deep-merged over a common base. The `lighthouserc`
//! files collect every sitemap URL, homepages and static routes included.

use std::{fs, path::Path};

use blocksite_core::{Config, PageRecord, config::CategoryThresholds};
use chrono::Utc;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::info;

use crate::{collector::SiteContent, sitemap::SitemapGenerator};

/// File name of the audited URL list.
pub const URLS_FILE: &str = "lhci-urls.json";

/// Lighthouse generation errors.
#[derive(Debug, Error)]
pub enum LighthouseError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Lighthouse operations.
pub type Result<T> = std::result::Result<T, LighthouseError>;

/// Emulated device of a Lighthouse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Desktop,
    Mobile,
}

impl FormFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    /// File name of the config for this form factor.
    pub fn file_name(&self) -> String {
        format!("lighthouserc.{}.json", self.as_str())
    }
}

/// URLs of every localized page with a non-empty slug.
///
/// Homepages are left out; trailing slashes are trimmed.
pub fn lhci_urls(records: &[PageRecord], site_url: &str) -> Vec<String> {
    let base = site_url.trim_end_matches('/');

    records
        .iter()
        .flat_map(|record| record.slug_locales())
        .filter(|(_, slug)| !slug.is_empty())
        .map(|(locale, slug)| {
            format!("{base}/{locale}/{slug}")
                .trim_end_matches('/')
                .to_string()
        })
        .collect()
}

/// Builder of `lighthouserc` JSON documents.
#[derive(Debug, Clone)]
pub struct LighthouseRc {
    urls: Vec<String>,
    number_of_runs: u32,
}

impl LighthouseRc {
    pub fn new(urls: Vec<String>, number_of_runs: u32) -> Self {
        Self {
            urls,
            number_of_runs,
        }
    }

    /// Config shared by every form factor.
    pub fn common(&self) -> Value {
        json!({
            "ci": {
                "collect": {
                    "url": self.urls,
                    "numberOfRuns": self.number_of_runs,
                    "settings": {},
                },
                "assert": {
                    "assertions": {},
                },
                "upload": {
                    "target": "temporary-public-storage",
                },
            }
        })
    }

    /// Full config for one form factor.
    pub fn render(&self, form_factor: FormFactor, thresholds: &CategoryThresholds) -> Value {
        let overlay = json!({
            "ci": {
                "collect": {
                    "settings": {
                        "emulatedFormFactor": form_factor.as_str(),
                    },
                },
                "assert": {
                    "assertions": assertions(thresholds),
                },
            }
        });

        let mut config = self.common();
        deep_merge(&mut config, overlay);
        config
    }
}

fn assertions(thresholds: &CategoryThresholds) -> Value {
    let categories = [
        ("performance", thresholds.performance),
        ("accessibility", thresholds.accessibility),
        ("best-practices", thresholds.best_practices),
        ("seo", thresholds.seo),
    ];

    let map: Map<String, Value> = categories
        .into_iter()
        .map(|(name, score)| {
            (
                format!("categories:{name}"),
                json!(["error", { "minScore": score }]),
            )
        })
        .collect();
    Value::Object(map)
}

/// Merge `overlay` into `base`. Objects merge recursively; arrays are
/// concatenated; any other overlay value replaces the base value.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(overlay)) => base.extend(overlay),
        (base, overlay) => *base = overlay,
    }
}

/// Files written by [`write_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LighthouseOutput {
    /// Entries of `lhci-urls.json`.
    pub urls: usize,
    /// URLs collected by the `lighthouserc` files.
    pub collected: usize,
    pub files: Vec<String>,
}

/// Write the URL list and both `lighthouserc` files into `out_dir`.
pub fn write_all(config: &Config, content: &SiteContent, out_dir: &Path) -> Result<LighthouseOutput> {
    fs::create_dir_all(out_dir)?;

    let urls = lhci_urls(&content.records, &config.site.url);
    fs::write(out_dir.join(URLS_FILE), serde_json::to_string_pretty(&urls)?)?;

    let collected: Vec<String> = SitemapGenerator::new(config.clone())
        .collect_urls(content, Utc::now())
        .into_iter()
        .map(|url| url.loc)
        .collect();
    let collected_count = collected.len();

    let rc = LighthouseRc::new(collected, config.lighthouse.number_of_runs);
    let mut files = vec![URLS_FILE.to_string()];

    for (form_factor, thresholds) in [
        (FormFactor::Desktop, &config.lighthouse.desktop),
        (FormFactor::Mobile, &config.lighthouse.mobile),
    ] {
        let name = form_factor.file_name();
        let value = rc.render(form_factor, thresholds);
        fs::write(out_dir.join(&name), serde_json::to_string_pretty(&value)?)?;
        files.push(name);
    }

    info!(
        urls = urls.len(),
        collected = collected_count,
        dir = %out_dir.display(),
        "lighthouse inputs written"
    );

    Ok(LighthouseOutput {
        urls: urls.len(),
        collected: collected_count,
        files,
    })
}
