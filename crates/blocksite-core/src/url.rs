//! URL and route helpers shared by page rendering, the sitemap and Lighthouse.

/// Returns the base URL of the site, optionally appending a path.
///
/// A single trailing `/` is removed from `site_url`. A path without a leading
/// `/` gets one.
pub fn base_url(site_url: &str, path: Option<&str>) -> String {
    let base = site_url.strip_suffix('/').unwrap_or(site_url);

    match path {
        Some(path) if !path.is_empty() => {
            if path.starts_with('/') {
                format!("{base}{path}")
            } else {
                format!("{base}/{path}")
            }
        }
        _ => base.to_string(),
    }
}

/// Returns the locale-prefixed path for an href.
///
/// `localized_path("en", "/contact")` is `/en/contact`; the site root maps to
/// `/en`.
pub fn localized_path(locale: &str, href: &str) -> String {
    let href = href.trim_start_matches('/');
    if href.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{href}")
    }
}

/// Returns the absolute localized URL for an href.
pub fn localized_url(site_url: &str, href: &str, locale: &str) -> String {
    base_url(site_url, None) + &localized_path(locale, href)
}

/// Combines route segments into a single slug.
///
/// `["blog", "my-post"]` becomes `blog/my-post`; no segments is the homepage
/// (empty slug).
pub fn build_slug<S: AsRef<str>>(slugs: &[S]) -> String {
    slugs
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits a slug back into route segments. The homepage has none.
pub fn split_slug(slug: &str) -> Option<Vec<String>> {
    if slug.is_empty() {
        None
    } else {
        Some(slug.split('/').map(str::to_string).collect())
    }
}

/// Returns the website slug of a record; the empty slug is the homepage.
pub fn record_to_slug(slug: &str) -> &str {
    if slug.is_empty() { "/" } else { slug }
}

/// Returns the website route of a page record in the given locale.
pub fn record_to_website_route(locale: &str, slug: &str) -> String {
    format!("/{locale}/{}", record_to_slug(slug)).replace("//", "/")
}
