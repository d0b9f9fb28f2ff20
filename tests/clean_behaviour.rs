use std::error::Error;
use std::fs;
use std::path::Path;

use sitepipe::config::SiteConfig;
use sitepipe::tasks::clean::{self, CleanMode};

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

fn populate_dist(dist: &Path) {
    write(&dist.join("index.html"), "<html></html>");
    write(&dist.join("assets/css/main.css"), "body {}");
    write(&dist.join("assets/img/logo.png"), "png-bytes");
    write(&dist.join("assets/img/photos/team.jpg"), "jpg-bytes");
}

#[test]
fn clean_dist_preserves_the_image_subtree() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = site_config(tmp.path());
    let dist = cfg.dest_root();
    populate_dist(&dist);

    clean::run(&cfg, CleanMode::KeepCached)?;

    assert!(dist.exists());
    assert!(!dist.join("index.html").exists());
    assert!(!dist.join("assets/css").exists());
    assert!(dist.join("assets/img/logo.png").exists());
    assert!(dist.join("assets/img/photos/team.jpg").exists());

    Ok(())
}

#[test]
fn cleaning_twice_is_a_noop_the_second_time() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = site_config(tmp.path());
    populate_dist(&cfg.dest_root());

    clean::run(&cfg, CleanMode::KeepCached)?;
    clean::run(&cfg, CleanMode::KeepCached)?;

    assert!(cfg.dest_root().join("assets/img/logo.png").exists());
    assert!(!cfg.dest_root().join("index.html").exists());

    Ok(())
}

#[test]
fn full_clean_removes_tree_and_image_cache() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = site_config(tmp.path());
    populate_dist(&cfg.dest_root());
    write(&cfg.image_cache_file(), "abc assets/img/logo.png\n");

    clean::run(&cfg, CleanMode::Full)?;

    let dist = cfg.dest_root();
    assert!(dist.exists());
    assert_eq!(fs::read_dir(&dist)?.count(), 0);
    assert!(!cfg.image_cache_file().exists());

    Ok(())
}

#[test]
fn cleaning_a_missing_destination_succeeds() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = site_config(tmp.path());

    clean::run(&cfg, CleanMode::Full)?;
    assert!(cfg.dest_root().exists());

    fs::remove_dir_all(cfg.dest_root())?;
    clean::run(&cfg, CleanMode::KeepCached)?;
    assert!(cfg.dest_root().exists());

    Ok(())
}
