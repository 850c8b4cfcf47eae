//! End-to-end tests for rendering CMS block lists.

use std::{fs, sync::Arc};

use blocksite_blocks::{
    CollectingReporter, ComponentRegistry, ContentRenderer, LazyRendererCache, RenderedBlock,
};
use blocksite_core::{ContentBlock, PageRecord};

fn default_registry() -> ComponentRegistry {
    ComponentRegistry::new().with("ImageBlock", |block: &ContentBlock| {
        format!("DefaultImageBlock: {}", block.id)
    })
}

fn renderer_with(reporter: Arc<CollectingReporter>) -> ContentRenderer {
    ContentRenderer::builder()
        .defaults(default_registry())
        .reporter(reporter)
        .build()
}

fn html(output: &[RenderedBlock]) -> Vec<&str> {
    output.iter().map(|b| b.html.as_str()).collect()
}

#[test]
fn test_custom_renderer_from_override_registry() {
    let renderer = renderer_with(Arc::new(CollectingReporter::new()));
    let blocks = [ContentBlock::new("123", "VideoBlockRecord")
        .with_field("videoUrl", "https://www.youtube.com/watch?v=123")];
    let overrides = ComponentRegistry::new().with("VideoBlock", |block: &ContentBlock| {
        format!("Custom VideoBlock: {}", block.id)
    });

    let output = renderer.render_all(&blocks, Some(&overrides));

    assert_eq!(html(&output), ["Custom VideoBlock: 123"]);
    assert_eq!(output[0].key, "123");
    assert_eq!(output[0].type_tag, "VideoBlockRecord");
}

#[test]
fn test_override_takes_precedence_over_default() {
    let renderer = renderer_with(Arc::new(CollectingReporter::new()));
    let blocks = [
        ContentBlock::new("123", "VideoBlockRecord").with_field("videoUrl", "u"),
        ContentBlock::new("456", "ImageBlockRecord").with_field("imageUrl", "x"),
    ];
    let overrides = ComponentRegistry::new()
        .with("VideoBlock", |b: &ContentBlock| format!("Custom VideoBlock: {}", b.id))
        .with("ImageBlock", |b: &ContentBlock| format!("Custom ImageBlock: {}", b.id));

    let output = renderer.render_all(&blocks, Some(&overrides));

    assert_eq!(
        html(&output),
        ["Custom VideoBlock: 123", "Custom ImageBlock: 456"]
    );
}

#[test]
fn test_default_registry_used_when_not_overridden() {
    let renderer = renderer_with(Arc::new(CollectingReporter::new()));
    let blocks = [ContentBlock::new("789", "ImageBlockRecord").with_field("imageUrl", "x")];

    let output = renderer.render_all(&blocks, Some(&ComponentRegistry::new()));
    assert_eq!(html(&output), ["DefaultImageBlock: 789"]);

    let output = renderer.render_all(&blocks, None);
    assert_eq!(html(&output), ["DefaultImageBlock: 789"]);
}

#[test]
fn test_placeholder_is_excluded() {
    let renderer = renderer_with(Arc::new(CollectingReporter::new()));
    let blocks = [
        ContentBlock::new("1", "VideoBlockRecord").with_field("videoUrl", "u"),
        ContentBlock::new("2", "ImageBlockRecord"),
    ];
    let overrides =
        ComponentRegistry::new().with("VideoBlock", |b: &ContentBlock| format!("R1({})", b.id));

    let output = renderer.render_all(&blocks, Some(&overrides));

    assert_eq!(output.len(), 1);
    assert_eq!(html(&output), ["R1(1)"]);
}

#[test]
fn test_order_is_preserved() {
    let renderer = renderer_with(Arc::new(CollectingReporter::new()));
    let blocks = [
        ContentBlock::new("1", "VideoBlockRecord").with_field("videoUrl", "u"),
        ContentBlock::new("2", "ImageBlockRecord").with_field("imageUrl", "x"),
        ContentBlock::new("3", "VideoBlockRecord").with_field("videoUrl", "v"),
    ];
    let overrides =
        ComponentRegistry::new().with("VideoBlock", |b: &ContentBlock| format!("R1({})", b.id));

    let output = renderer.render_all(&blocks, Some(&overrides));

    assert_eq!(html(&output), ["R1(1)", "DefaultImageBlock: 2", "R1(3)"]);
    let keys: Vec<_> = output.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, ["1", "2", "3"]);
}

#[test]
fn test_unresolved_renderer_degrades_and_reports_once() {
    let reporter = Arc::new(CollectingReporter::new());
    let dir = tempfile::tempdir().unwrap();
    let renderer = ContentRenderer::builder()
        .defaults(default_registry())
        .templates_dir(dir.path())
        .reporter(reporter.clone())
        .build();
    let blocks = [
        ContentBlock::new("1", "NonExistentRecord").with_field("a", 1),
        ContentBlock::new("2", "ImageBlockRecord").with_field("imageUrl", "x"),
        ContentBlock::new("3", "NonExistentRecord").with_field("a", 2),
    ];

    let output = renderer.render_all(&blocks, None);

    assert_eq!(html(&output), ["", "DefaultImageBlock: 2", ""]);

    let messages = reporter.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains(r#"Renderer "NonExistent" not found"#));
    assert!(messages[0].contains("blocks/NonExistent/NonExistent.html"));
}

#[test]
fn test_template_convention_and_shared_cache() {
    let dir = tempfile::tempdir().unwrap();
    let block_dir = dir.path().join("blocks").join("QuoteBlock");
    fs::create_dir_all(&block_dir).unwrap();
    fs::write(
        block_dir.join("QuoteBlock.html"),
        r#"<blockquote id="{{ id }}">{{ quote }}{{ author? }}</blockquote>"#,
    )
    .unwrap();

    let cache = Arc::new(LazyRendererCache::new());
    let first = ContentRenderer::builder()
        .templates_dir(dir.path())
        .cache(cache.clone())
        .build();
    let blocks = [ContentBlock::new("q", "QuoteBlockRecord").with_field("quote", "Hi & bye")];

    let output = first.render_all(&blocks, None);
    assert_eq!(html(&output), [r#"<blockquote id="q">Hi &amp; bye</blockquote>"#]);
    assert_eq!(cache.len(), 1);

    // A renderer sharing the cache reuses the loaded template even after the
    // file is gone.
    fs::remove_dir_all(dir.path().join("blocks")).unwrap();
    let second = ContentRenderer::builder()
        .templates_dir(dir.path())
        .cache(cache)
        .build();
    assert_eq!(second.render_all(&blocks, None), output);
}

#[test]
fn test_builtin_blocks_from_page_record() {
    let record = PageRecord::from_json(
        r#"{
            "id": "home",
            "locales": {
                "en": {
                    "slug": "",
                    "content": [
                        { "id": "v", "__typename": "VideoBlockRecord", "videoUrl": "https://youtu.be/abc" },
                        { "id": "p", "__typename": "VideoBlockRecord" },
                        { "id": "g", "__typename": "ImageGalleryBlockRecord", "galleryImages": ["https://x/1.jpg"] }
                    ]
                }
            }
        }"#,
    )
    .unwrap();
    let page = record.localized("en").unwrap();

    let reporter = Arc::new(CollectingReporter::new());
    let output = ContentRenderer::builder()
        .reporter(reporter.clone())
        .build()
        .render_all(&page.content, None);

    assert_eq!(output.len(), 2);
    assert!(output[0].html.contains("youtube.com/embed/abc"));
    assert!(output[1].html.contains(r#"<img src="https://x/1.jpg""#));
    assert!(reporter.is_empty());
}
