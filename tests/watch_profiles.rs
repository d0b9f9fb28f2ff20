use std::error::Error;

use sitepipe::config::SiteConfig;
use sitepipe::pipeline::TaskKind;
use sitepipe::watch::{build_watch_profiles, lenient_globset};

type TestResult = Result<(), Box<dyn Error>>;

fn owners(cfg: &SiteConfig, rel_path: &str) -> Vec<TaskKind> {
    build_watch_profiles(cfg)
        .iter()
        .filter(|p| p.matches(rel_path))
        .map(|p| p.task())
        .collect()
}

#[test]
fn each_asset_category_maps_to_exactly_one_task() -> TestResult {
    let cfg = SiteConfig::default();

    assert_eq!(
        owners(&cfg, "assets/scss/layout/_grid.scss"),
        vec![TaskKind::Styles]
    );
    assert_eq!(owners(&cfg, "pages/about/index.html"), vec![TaskKind::Pages]);
    assert_eq!(owners(&cfg, "templates/base.html"), vec![TaskKind::Pages]);
    assert_eq!(owners(&cfg, "data/data.json"), vec![TaskKind::Pages]);
    assert_eq!(owners(&cfg, "assets/img/logo.png"), vec![TaskKind::Images]);
    assert_eq!(
        owners(&cfg, "assets/img/photos/team.jpeg"),
        vec![TaskKind::Images]
    );
    assert_eq!(
        owners(&cfg, "assets/fonts/body/regular.woff2"),
        vec![TaskKind::Fonts]
    );
    assert_eq!(owners(&cfg, "assets/js/app.js"), vec![TaskKind::Scripts]);

    Ok(())
}

#[test]
fn unwatched_paths_match_no_task() -> TestResult {
    let cfg = SiteConfig::default();

    assert!(owners(&cfg, "README.md").is_empty());
    assert!(owners(&cfg, "assets/img/notes.txt").is_empty());
    assert!(owners(&cfg, "assets/js/styles.scss").is_empty());

    Ok(())
}

#[test]
fn invalid_pattern_degrades_to_empty_match_set() -> TestResult {
    let set = lenient_globset(&["app/[".to_string()]);
    assert!(!set.is_match("app/anything"));

    // Valid patterns in the same list survive.
    let set = lenient_globset(&["**/*.scss".to_string(), "app/[".to_string()]);
    assert!(set.is_match("assets/scss/main.scss"));
    assert!(!set.is_match("app/anything"));

    Ok(())
}
