//! Command tests against the demo site.

use std::{fs, path::Path};

use blocksite::cmd;
use tempfile::TempDir;

const DEMO_CONFIG: &str = "../../demo/blocksite.toml";

fn demo_config() -> Option<&'static Path> {
    let path = Path::new(DEMO_CONFIG);
    // Skip if running from different working directory
    path.exists().then_some(path)
}

#[test]
fn test_check_demo_strict() {
    let Some(config) = demo_config() else { return };
    cmd::check::run(config, true).expect("demo site should pass a strict check");
}

#[test]
fn test_dry_render_demo() {
    let Some(config_path) = demo_config() else { return };
    let config = blocksite::load_config(config_path).unwrap();
    let content = blocksite::ContentCollector::new(config.clone(), config.content_dir())
        .collect()
        .unwrap();

    let dry = cmd::check::dry_render(&config, &content);

    assert_eq!(dry.pages, 4);
    assert_eq!(dry.placeholders, 1);
    assert!(dry.unresolved.is_empty());
}

#[test]
fn test_build_demo() {
    let Some(config) = demo_config() else { return };
    let output = TempDir::new().unwrap();

    cmd::build::run(
        config,
        Some(output.path()),
        false,
        Some("https://preview.blocksite.dev"),
        true,
    )
    .unwrap();

    let home = fs::read_to_string(output.path().join("en/index.html")).unwrap();
    assert!(home.contains(r#"<link rel="canonical" href="https://preview.blocksite.dev/en""#));
    assert!(output.path().join("fr/galerie/index.html").exists());
    assert!(output.path().join("styles.css").exists());
}

#[test]
fn test_lighthouse_demo() {
    let Some(config) = demo_config() else { return };
    let out = TempDir::new().unwrap();

    cmd::lighthouse::run(config, out.path()).unwrap();

    let urls: Vec<String> =
        serde_json::from_str(&fs::read_to_string(out.path().join("lhci-urls.json")).unwrap())
            .unwrap();
    assert_eq!(urls.len(), 2);
}
