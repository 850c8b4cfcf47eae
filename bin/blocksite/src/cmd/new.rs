//! New command - scaffold a block renderer

use std::{fs, path::Path};

use blocksite_blocks::{RECORD_SUFFIX, loader};
use blocksite_core::Config;
use color_eyre::eyre::{Result, WrapErr, bail};
use serde_json::json;

/// Directory of sample block records, relative to the content directory.
const SAMPLE_BLOCKS_DIR: &str = "blocks";

/// Run the new command.
///
/// Creates `<templates_dir>/blocks/<Name>/<Name>.html` and a sample record at
/// `<content_dir>/blocks/<Name>.json`, using the directories of the config at
/// `config_path`. Without a config file the default directories under the
/// config's parent are used. Existing files are left alone.
pub fn run(config_path: &Path, name: &str) -> Result<()> {
    tracing::info!(?config_path, name, "Scaffolding block");

    let name = pascal_case(name);
    if name.is_empty() {
        bail!("Block name is required");
    }

    let config = if config_path.exists() {
        crate::load_config(config_path).wrap_err("Failed to load configuration")?
    } else {
        let mut config = Config::new(name.as_str());
        crate::rebase(&mut config, &crate::site_root(config_path));
        config
    };

    let template_path = config
        .templates_dir()
        .join(loader::BLOCKS_DIR)
        .join(&name)
        .join(format!("{name}.html"));
    let sample_path = config
        .content_dir()
        .join(SAMPLE_BLOCKS_DIR)
        .join(format!("{name}.json"));

    write_new(&template_path, &block_template(&name))?;
    write_new(&sample_path, &sample_record(&name)?)?;

    println!("Created: {}", template_path.display());
    println!("Created: {}", sample_path.display());
    println!();
    println!("  Records typed {name}{RECORD_SUFFIX} now render with this template.");

    Ok(())
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    fs::write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// `video block`, `video-block` and `videoBlock` all become `VideoBlock`.
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// CSS class of a block: `VideoBlock` becomes `video-block`.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn block_template(name: &str) -> String {
    let class = kebab_case(name);
    format!(
        r#"<section class="{class}" id="{{{{ id }}}}">
  <h2>{{{{ title? }}}}</h2>
  <p>{{{{ text? }}}}</p>
</section>
"#
    )
}

fn sample_record(name: &str) -> Result<String> {
    let record = json!({
        "id": format!("{}-sample", kebab_case(name)),
        "__typename": format!("{name}{RECORD_SUFFIX}"),
        "title": name,
        "text": "Write your content here.",
    });
    Ok(serde_json::to_string_pretty(&record)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("video block"), "VideoBlock");
        assert_eq!(pascal_case("image-gallery"), "ImageGallery");
        assert_eq!(pascal_case("quoteBlock"), "QuoteBlock");
        assert_eq!(pascal_case("CallToAction"), "CallToAction");
        assert_eq!(pascal_case(" - "), "");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("VideoBlock"), "video-block");
        assert_eq!(kebab_case("Hero"), "hero");
    }

    #[test]
    fn test_block_template() {
        let template = block_template("QuoteBlock");
        assert!(template.starts_with(r#"<section class="quote-block" id="{{ id }}">"#));
        assert!(template.contains("{{ title? }}"));
    }

    #[test]
    fn test_scaffold() {
        let dir = tempfile::tempdir().unwrap();

        run(&dir.path().join("blocksite.toml"), "quote block").unwrap();

        let template = dir.path().join("templates/blocks/QuoteBlock/QuoteBlock.html");
        assert!(template.exists());

        let sample = fs::read_to_string(dir.path().join("content/blocks/QuoteBlock.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&sample).unwrap();
        assert_eq!(value["__typename"], "QuoteBlockRecord");
        assert_eq!(value["id"], "quote-block-sample");
    }

    #[test]
    fn test_scaffold_uses_configured_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("blocksite.toml");
        fs::write(
            &config_path,
            r#"
[site]
title = "Themed"

[build]
templates_dir = "theme/templates"
content_dir = "cms"
"#,
        )
        .unwrap();

        run(&config_path, "Hero").unwrap();

        let template = dir.path().join("theme/templates/blocks/Hero/Hero.html");
        assert!(template.exists());
        assert!(dir.path().join("cms/blocks/Hero.json").exists());
        assert!(!dir.path().join("templates").exists());

        // The block loader finds the scaffolded template.
        let config = crate::load_config(&config_path).unwrap();
        let convention = loader::ConventionLoader::new(config.templates_dir());
        assert!(loader::BlockLoader::load(&convention, &"Hero".into()).is_ok());
    }

    #[test]
    fn test_scaffold_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("blocksite.toml");
        run(&config_path, "Hero").unwrap();
        assert!(run(&config_path, "Hero").is_err());
    }

    #[test]
    fn test_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("blocksite.toml"), "").is_err());
    }
}
