use std::error::Error;
use std::fs;
use std::path::Path;

use sitepipe::config::SiteConfig;
use sitepipe::context::PipelineContext;
use sitepipe::serve::LIVERELOAD_SNIPPET;
use sitepipe::tasks::{fonts, images, pages, scripts, styles};

type TestResult = Result<(), Box<dyn Error>>;

fn site_config(root: &Path) -> SiteConfig {
    let mut cfg = SiteConfig::default();
    cfg.source.root = root.join("app").display().to_string();
    cfg.dest.root = root.join("dist").display().to_string();
    cfg.cache_dir = root.join(".sitepipe").display().to_string();
    cfg
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

fn dev_context(root: &Path) -> PipelineContext {
    PipelineContext::new(site_config(root), false, false)
}

fn production_context(root: &Path) -> PipelineContext {
    PipelineContext::new(site_config(root), true, false)
}

#[test]
fn stylesheets_compile_to_mirrored_css() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());
    let scss = ctx.config.styles_dir();

    write(&scss.join("_vars.scss"), "$accent: #ff0000;\n");
    write(
        &scss.join("main.scss"),
        "@use \"vars\";\n\nbody {\n  color: vars.$accent;\n}\n",
    );

    let written = styles::run(&ctx)?;
    assert_eq!(written, 1);

    let out = ctx.config.styles_out_dir().join("main.css");
    let css = fs::read_to_string(&out)?;
    assert!(css.contains("color: #ff0000"));

    // Partials compile into their importers, never on their own.
    assert!(!ctx.config.styles_out_dir().join("_vars.css").exists());

    Ok(())
}

#[test]
fn styles_task_is_idempotent() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());
    write(
        &ctx.config.styles_dir().join("main.scss"),
        "body {\n  margin: 0;\n}\n",
    );

    styles::run(&ctx)?;
    let first = fs::read(ctx.config.styles_out_dir().join("main.css"))?;
    styles::run(&ctx)?;
    let second = fs::read(ctx.config.styles_out_dir().join("main.css"))?;
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn production_styles_are_minified() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let source = "body {\n  margin: 0;\n  color: #ff0000;\n}\n";

    let dev = dev_context(tmp.path());
    write(&dev.config.styles_dir().join("main.scss"), source);
    styles::run(&dev)?;
    let dev_css = fs::read_to_string(dev.config.styles_out_dir().join("main.css"))?;

    let prod_tmp = tempfile::tempdir()?;
    let prod = production_context(prod_tmp.path());
    write(&prod.config.styles_dir().join("main.scss"), source);
    styles::run(&prod)?;
    let prod_css = fs::read_to_string(prod.config.styles_out_dir().join("main.css"))?;

    assert!(prod_css.len() <= dev_css.len());
    assert!(!prod_css.contains("\n  "));
    assert!(prod_css.contains("body"));

    Ok(())
}

#[test]
fn pages_render_with_data_and_shared_templates() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());

    write(
        &ctx.config.templates_dir().join("base.html"),
        "<html><body>{% block content %}{% endblock %}</body></html>",
    );
    write(
        &ctx.config.pages_dir().join("index.html"),
        "{% extends \"base.html\" %}{% block content %}<h1>{{ title }}</h1>{% endblock %}",
    );
    write(&ctx.config.data_file(), r#"{"title": "Hello from data"}"#);

    let written = pages::run(&ctx)?;
    assert_eq!(written, 1);

    let html = fs::read_to_string(ctx.config.dest_root().join("index.html"))?;
    assert!(html.contains("<h1>Hello from data</h1>"));
    assert!(!html.contains("__livereload"));

    Ok(())
}

#[test]
fn watch_mode_pages_carry_the_livereload_snippet() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = PipelineContext::new(site_config(tmp.path()), false, true);

    write(
        &ctx.config.pages_dir().join("index.html"),
        "<html><body><p>hi</p></body></html>",
    );

    pages::run(&ctx)?;
    let html = fs::read_to_string(ctx.config.dest_root().join("index.html"))?;

    let snippet_at = html.find(LIVERELOAD_SNIPPET).expect("snippet injected");
    let body_at = html.find("</body>").expect("body close kept");
    assert!(snippet_at < body_at);

    Ok(())
}

#[test]
fn missing_data_file_renders_with_empty_context() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());

    write(
        &ctx.config.pages_dir().join("plain.html"),
        "<html><body>static</body></html>",
    );

    let written = pages::run(&ctx)?;
    assert_eq!(written, 1);
    let html = fs::read_to_string(ctx.config.dest_root().join("plain.html"))?;
    assert!(html.contains("static"));

    Ok(())
}

#[test]
fn scripts_pass_through_unmodified_in_dev() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());
    let source = "function add(a, b) {\n  // sum them\n  return a + b;\n}\nconsole.log(add(1, 2));\n";

    write(&ctx.config.scripts_dir().join("app.js"), source);

    let written = scripts::run(&ctx)?;
    assert_eq!(written, 1);

    let out = fs::read_to_string(ctx.config.scripts_out_dir().join("app.js"))?;
    assert_eq!(out, source);

    Ok(())
}

#[test]
fn production_scripts_are_minified() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = production_context(tmp.path());
    let source = "function add(a, b) {\n  // sum them\n  return a + b;\n}\nconsole.log(add(1, 2));\n";

    write(&ctx.config.scripts_dir().join("app.js"), source);
    scripts::run(&ctx)?;

    let out = fs::read(ctx.config.scripts_out_dir().join("app.js"))?;
    assert!(!out.is_empty());
    assert!(out.len() < source.len());

    Ok(())
}

#[test]
fn fonts_copy_preserving_structure() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());

    write(&ctx.config.fonts_dir().join("body/regular.woff2"), "woff2");
    write(&ctx.config.fonts_dir().join("display.ttf"), "ttf");

    let copied = fonts::run(&ctx)?;
    assert_eq!(copied, 2);

    let out = ctx.config.fonts_out_dir();
    assert_eq!(fs::read_to_string(out.join("body/regular.woff2"))?, "woff2");
    assert_eq!(fs::read_to_string(out.join("display.ttf"))?, "ttf");

    Ok(())
}

#[test]
fn unchanged_images_are_skipped_via_the_content_cache() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let ctx = dev_context(tmp.path());
    let src = ctx.config.images_dir().join("logo.svg");

    write(&src, "<svg>v1</svg>");
    write(&ctx.config.images_dir().join("notes.txt"), "not an image");

    let written = images::run(&ctx)?;
    assert_eq!(written, 1);
    assert!(ctx.config.image_cache_file().exists());

    let out = ctx.config.images_out_dir().join("logo.svg");
    assert_eq!(fs::read_to_string(&out)?, "<svg>v1</svg>");

    // Tamper with the output; an unchanged source must be skipped, so the
    // tampering survives the second run.
    fs::write(&out, "tampered")?;
    let written = images::run(&ctx)?;
    assert_eq!(written, 0);
    assert_eq!(fs::read_to_string(&out)?, "tampered");

    // Editing the source invalidates the cache entry by content hash.
    write(&src, "<svg>v2</svg>");
    let written = images::run(&ctx)?;
    assert_eq!(written, 1);
    assert_eq!(fs::read_to_string(&out)?, "<svg>v2</svg>");

    Ok(())
}
