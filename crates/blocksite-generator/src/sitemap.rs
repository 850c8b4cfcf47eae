//! Sitemap generation.
//!
//! Static routes come first, then one entry per localized page. Large sites
//! are split into `sitemap-N.xml` files referenced from a sitemap index.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use blocksite_core::{Config, LocalizedPage};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::collector::SiteContent;

/// Name of the main sitemap file.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Other language versions of the same page.
    pub alternates: Vec<AlternateLink>,
}

/// Alternate language link for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    /// Language code (e.g., "en", "fr").
    pub hreflang: String,

    /// URL for this language version.
    pub href: String,
}

/// Files written by [`SitemapGenerator::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapOutput {
    /// Number of URLs across all files.
    pub urls: usize,

    /// Sub-sitemap file names; empty when a single sitemap was written.
    pub parts: Vec<String>,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Collect sitemap entries: static routes, then every published page.
    ///
    /// Pages come from the `(locale, slug)` index, so each built page appears
    /// once. Draft records are left out even when drafts are built.
    pub fn collect_urls(&self, content: &SiteContent, now: DateTime<Utc>) -> Vec<SitemapUrl> {
        let drafts: HashSet<&str> = content
            .records
            .iter()
            .filter(|record| record.draft)
            .map(|record| record.id.as_str())
            .collect();

        let mut by_record: BTreeMap<&str, Vec<&LocalizedPage>> = BTreeMap::new();
        for page in content.iter() {
            by_record.entry(page.record_id.as_str()).or_default().push(page);
        }

        let static_urls = self.config.sitemap.static_routes.iter().map(|route| SitemapUrl {
            loc: self.config.url_for(route),
            lastmod: Some(now),
            alternates: Vec::new(),
        });

        let page_urls = content
            .iter()
            .filter(|page| !drafts.contains(page.record_id.as_str()))
            .map(|page| SitemapUrl {
                loc: self.page_url(&page.slug, &page.locale),
                lastmod: page.updated_at,
                alternates: by_record
                    .get(page.record_id.as_str())
                    .into_iter()
                    .flatten()
                    .filter(|other| other.locale != page.locale)
                    .map(|other| AlternateLink {
                        hreflang: other.locale.clone(),
                        href: self.page_url(&other.slug, &other.locale),
                    })
                    .collect(),
            });

        static_urls.chain(page_urls).collect()
    }

    fn page_url(&self, slug: &str, locale: &str) -> String {
        self.config.localized_url(&format!("/{slug}"), locale)
    }

    /// Generate sitemap XML from URL entries.
    pub fn generate(&self, urls: &[SitemapUrl]) -> String {
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#);

        if self.config.i18n.locales.len() > 1 {
            xml.push_str(r#" xmlns:xhtml="http://www.w3.org/1999/xhtml""#);
        }
        xml.push_str(">\n");

        for url in urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Generate a sitemap index for sub-sitemaps.
    pub fn generate_index(&self, sitemaps: &[String], now: DateTime<Utc>) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        let lastmod = now.format("%Y-%m-%d");

        for sitemap in sitemaps {
            xml.push_str("  <sitemap>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&self.config.url_for(sitemap))
            ));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str("  </sitemap>\n");
        }

        xml.push_str("</sitemapindex>\n");
        xml
    }

    /// Write the sitemap(s) for `content` into `output_dir`.
    pub fn write(
        &self,
        content: &SiteContent,
        output_dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<SitemapOutput> {
        let urls = self.collect_urls(content, now);
        let page_size = self.config.sitemap.page_size.max(1);

        if urls.len() <= page_size {
            fs::write(output_dir.join(SITEMAP_FILE), self.generate(&urls))?;
            info!(urls = urls.len(), "sitemap generated");
            return Ok(SitemapOutput {
                urls: urls.len(),
                parts: Vec::new(),
            });
        }

        let mut parts = Vec::new();
        for (i, chunk) in urls.chunks(page_size).enumerate() {
            let name = format!("sitemap-{}.xml", i + 1);
            fs::write(output_dir.join(&name), self.generate(chunk))?;
            parts.push(name);
        }

        fs::write(output_dir.join(SITEMAP_FILE), self.generate_index(&parts, now))?;
        info!(urls = urls.len(), files = parts.len(), "sitemap index generated");

        Ok(SitemapOutput {
            urls: urls.len(),
            parts,
        })
    }
}

fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));

    if let Some(lastmod) = &url.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }

    for alt in &url.alternates {
        xml.push_str(&format!(
            r#"    <xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
            alt.hreflang,
            escape_xml(&alt.href)
        ));
        xml.push('\n');
    }

    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
