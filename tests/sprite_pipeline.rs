//! Integration tests for the sprite build and registry round-trip

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use icon_sprite::registry::FALLBACK_ID;
use icon_sprite::{build_sprite, Resolution, SpriteConfig, SpriteRegistry};

fn write_icon(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Icons tree matching the documented end-to-end scenario
fn fixture_config(dir: &Path) -> SpriteConfig {
    let icons = dir.join("icons");
    write_icon(
        &icons,
        "nav/home.svg",
        r#"<svg viewBox="0 0 20 20"><path fill="currentColor" d="M2 2h16v16H2z"/></svg>"#,
    );
    write_icon(
        &icons,
        "nav/search.svg",
        r#"<svg viewBox="0 0 24 24"><circle cx="10" cy="10" r="7" stroke="currentColor" stroke-width="2"/></svg>"#,
    );
    write_icon(
        &icons,
        "nav/menu_bars.svg",
        r#"<svg><path stroke="currentColor" d="M3 6h18M3 12h18M3 18h18"/></svg>"#,
    );
    write_icon(
        &icons,
        "question.svg",
        r#"<svg viewBox="0 0 24 24"><path fill="currentColor" d="M9 9a3 3 0 1 1 6 0"/></svg>"#,
    );
    SpriteConfig::new()
        .with_icons_dir(icons)
        .with_output_dir(dir.join("static"))
}

#[test]
fn test_build_writes_sprite_with_expected_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    let report = build_sprite(&config).unwrap();
    assert_eq!(report.symbols, 4);
    assert_eq!(report.skipped, 0);

    let sprite = fs::read_to_string(config.sprite_path()).unwrap();
    assert!(sprite.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(sprite.contains("<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display:none\">"));
    assert!(sprite.contains("<symbol id=\"nav.home\" viewBox=\"0 0 20 20\" data-og-pattern=\"fill\""));
    assert!(sprite.contains("<symbol id=\"nav.search\""));
    assert!(sprite.contains("<symbol id=\"icons.question\""));
}

#[test]
fn test_build_records_patterns_and_stroke_width() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    build_sprite(&config).unwrap();

    let sprite = fs::read_to_string(config.sprite_path()).unwrap();
    let home = sprite
        .lines()
        .find(|l| l.contains("id=\"nav.home\""))
        .unwrap();
    assert!(home.contains("data-og-pattern=\"fill\""));

    let search = sprite
        .lines()
        .find(|l| l.contains("id=\"nav.search\""))
        .unwrap();
    assert!(search.contains("data-og-pattern=\"stroke\""));
    assert!(search.contains("data-og-stroke-width=\"2\""));

    let menu = sprite
        .lines()
        .find(|l| l.contains("id=\"nav.menu-bars\""))
        .unwrap();
    assert!(menu.contains("data-og-pattern=\"stroke\""));
}

#[test]
fn test_build_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    build_sprite(&config).unwrap();
    let first = fs::read_to_string(config.sprite_path()).unwrap();
    build_sprite(&config).unwrap();
    let second = fs::read_to_string(config.sprite_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_icon_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    write_icon(&config.icons_dir, "nav/broken.svg", "<svg><path</svg>");

    let report = build_sprite(&config).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.symbols, 4);

    let sprite = fs::read_to_string(config.sprite_path()).unwrap();
    assert!(!sprite.contains("nav.broken"));
}

#[test]
fn test_missing_icons_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = SpriteConfig::new()
        .with_icons_dir(dir.path().join("nope"))
        .with_output_dir(dir.path().join("static"));
    assert!(build_sprite(&config).is_err());
}

#[test]
fn test_round_trip_preserves_view_box() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    build_sprite(&config).unwrap();

    let registry = SpriteRegistry::load(&config.sprite_path()).unwrap();
    let markup = registry.resolve("nav.home").unwrap();
    assert!(!markup.is_empty());
    assert!(markup.contains("viewBox=\"0 0 20 20\""));

    // A source without a viewBox falls back to the default
    let menu = registry.resolve("nav.menu-bars").unwrap();
    assert!(menu.contains("viewBox=\"0 0 24 24\""));
}

#[test]
fn test_registry_resolves_dash_and_underscore_forms() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    build_sprite(&config).unwrap();

    let registry = SpriteRegistry::load(&config.sprite_path()).unwrap();
    assert_eq!(
        registry.resolve_name("nav.menu_bars"),
        Resolution::Exact("nav.menu-bars".to_string())
    );
    assert_eq!(
        registry.resolve_name("nav.menu-bars"),
        Resolution::Exact("nav.menu-bars".to_string())
    );
}

#[test]
fn test_unknown_name_falls_back_without_entering_sprite() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    build_sprite(&config).unwrap();

    let sprite = fs::read_to_string(config.sprite_path()).unwrap();
    assert!(!sprite.contains("nav.nonexistent"));

    let registry = SpriteRegistry::load(&config.sprite_path()).unwrap();
    assert_eq!(
        registry.resolve_name("nav.nonexistent"),
        Resolution::Fallback(FALLBACK_ID.to_string())
    );
}

#[test]
fn test_types_file_lists_icon_ids() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path()).with_types_path(dir.path().join("icon_names.rs"));
    build_sprite(&config).unwrap();

    let listing = fs::read_to_string(dir.path().join("icon_names.rs")).unwrap();
    assert!(listing.contains("pub mod nav {"));
    assert!(listing.contains("pub const HOME: &str = \"nav.home\";"));
    assert!(listing.contains("pub const MENU_BARS: &str = \"nav.menu-bars\";"));
    assert!(listing.contains("pub mod icons {"));
    assert!(listing.contains("pub const QUESTION: &str = \"icons.question\";"));
}
