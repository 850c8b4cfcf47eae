//! Built-in block renderers.
//!
//! These are used when no template exists for a block type, so a fresh site
//! renders video and gallery blocks without any setup.

use std::sync::Arc;

use blocksite_core::{ContentBlock, template::escape_html};
use serde_json::Value;

use crate::registry::SharedRenderer;

/// Keys of the built-in renderers.
pub const BUILTIN_BLOCKS: &[&str] = &["VideoBlock", "ImageGalleryBlock"];

/// Look up a built-in renderer.
pub fn builtin(key: &str) -> Option<SharedRenderer> {
    match key {
        "VideoBlock" => Some(Arc::new(video_block)),
        "ImageGalleryBlock" => Some(Arc::new(image_gallery_block)),
        _ => None,
    }
}

/// Render a `VideoBlock`.
///
/// YouTube URLs become an embedded player, anything else a `<video>` element.
/// Without a `videoUrl` the block renders nothing.
pub fn video_block(block: &ContentBlock) -> String {
    let Some(url) = block.field_str("videoUrl").filter(|u| !u.is_empty()) else {
        return String::new();
    };
    let title = block.field_str("title");

    let player = match youtube_id(url) {
        Some(id) => format!(
            r#"<iframe src="https://www.youtube.com/embed/{}" title="{}" allowfullscreen></iframe>"#,
            escape_html(id),
            escape_html(title.unwrap_or("YouTube video")),
        ),
        None => format!(r#"<video src="{}" controls></video>"#, escape_html(url)),
    };

    let caption = title
        .map(|t| format!("<figcaption>{}</figcaption>", escape_html(t)))
        .unwrap_or_default();

    format!(
        r#"<figure class="video-block" id="{}">{player}{caption}</figure>"#,
        escape_html(&block.id)
    )
}

/// Render an `ImageGalleryBlock`.
///
/// `galleryImages` entries are either URLs or objects with `url` and `alt`.
pub fn image_gallery_block(block: &ContentBlock) -> String {
    let images: Vec<String> = block
        .field("galleryImages")
        .and_then(Value::as_array)
        .map(|images| images.iter().filter_map(gallery_image).collect())
        .unwrap_or_default();

    if images.is_empty() {
        return String::new();
    }

    format!(
        r#"<div class="image-gallery-block" id="{}">{}</div>"#,
        escape_html(&block.id),
        images.concat()
    )
}

fn gallery_image(image: &Value) -> Option<String> {
    let (url, alt) = match image {
        Value::String(url) => (url.as_str(), ""),
        Value::Object(map) => (
            map.get("url")?.as_str()?,
            map.get("alt").and_then(Value::as_str).unwrap_or(""),
        ),
        _ => return None,
    };

    Some(format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        escape_html(url),
        escape_html(alt)
    ))
}

fn youtube_id(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    let id = if let Some(query) = rest.strip_prefix("youtube.com/watch?") {
        query.split('&').find_map(|pair| pair.strip_prefix("v="))?
    } else if let Some(path) = rest.strip_prefix("youtu.be/") {
        path.split(['?', '#']).next()?
    } else {
        return None;
    };

    (!id.is_empty()).then_some(id)
}
