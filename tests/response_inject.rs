//! End-to-end tests for rendering pages and injecting sprite definitions

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use pretty_assertions::assert_eq;

use icon_sprite::{build_sprite, Icon, SpriteConfig, SpriteInjector, UsedIcons};

fn write_icon(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn build_injector(dir: &Path) -> SpriteInjector {
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
        "question.svg",
        r#"<svg viewBox="0 0 24 24"><path fill="currentColor" d="M9 9a3 3 0 1 1 6 0"/></svg>"#,
    );
    let config = SpriteConfig::new()
        .with_icons_dir(icons)
        .with_output_dir(dir.join("static"));
    build_sprite(&config).unwrap();
    SpriteInjector::from_sprite_file(&config.sprite_path()).unwrap()
}

fn html_parts() -> http::response::Parts {
    let (parts, ()) = http::Response::builder()
        .status(200)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, "128")
        .body(())
        .unwrap()
        .into_parts();
    parts
}

/// Render a page body, then run it through the rewriter as one request
fn serve_page(injector: &SpriteInjector, icon_names: &[&str]) -> String {
    let mut used = UsedIcons::new();
    let mut content = String::new();
    for name in icon_names {
        content.push_str(&Icon::new(*name).render(injector.registry(), &mut used));
    }
    let body = format!("<html><head></head><body class=\"app\"><main>{content}</main></body></html>");

    let mut rewriter = injector.begin(&Method::GET, "/page");
    let mut parts = html_parts();
    rewriter.start(&mut parts);
    assert!(!parts.headers.contains_key(CONTENT_LENGTH));

    let out = rewriter
        .push_chunk(Bytes::from(body), false, &used)
        .expect("final chunk flushes");
    String::from_utf8(out.to_vec()).unwrap()
}

#[test]
fn test_defs_block_follows_body_tag_with_used_symbols_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let page = serve_page(&injector, &["nav.home", "nav.search"]);

    let after_body = page.split("<body class=\"app\">").nth(1).unwrap();
    assert!(after_body.starts_with("<svg style=\"display:none\">"));
    assert_eq!(page.matches("<symbol").count(), 2);

    let home_at = page.find("<symbol id=\"nav.home\"").unwrap();
    let search_at = page.find("<symbol id=\"nav.search\"").unwrap();
    assert!(home_at < search_at);

    // The page still carries the two <use> references
    assert!(page.contains("<use href=\"#nav.home\"/>"));
    assert!(page.contains("<use href=\"#nav.search\"/>"));
}

#[test]
fn test_icon_referenced_twice_is_injected_once() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let page = serve_page(&injector, &["nav.home", "nav.home"]);
    assert_eq!(page.matches("<symbol id=\"nav.home\"").count(), 1);
    assert_eq!(page.matches("<use href=\"#nav.home\"/>").count(), 2);
}

#[test]
fn test_page_without_icons_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let used = UsedIcons::new();
    let body = "<html><body><p>no icons here</p></body></html>";
    let mut rewriter = injector.begin(&Method::GET, "/plain");
    let mut parts = html_parts();
    rewriter.start(&mut parts);

    let out = rewriter
        .push_chunk(Bytes::from_static(body.as_bytes()), false, &used)
        .unwrap();
    assert_eq!(std::str::from_utf8(&out).unwrap(), body);
}

#[test]
fn test_chunked_body_is_spliced_once_complete() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let mut used = UsedIcons::new();
    Icon::new("nav.home").render(injector.registry(), &mut used);

    let mut rewriter = injector.begin(&Method::GET, "/page");
    let mut parts = html_parts();
    rewriter.start(&mut parts);

    assert_eq!(rewriter.push_chunk(Bytes::from_static(b"<html><bo"), true, &used), None);
    assert_eq!(rewriter.push_chunk(Bytes::from_static(b"dy><p>x</p>"), true, &used), None);
    let out = rewriter
        .push_chunk(Bytes::from_static(b"</body></html>"), false, &used)
        .unwrap();
    let text = std::str::from_utf8(&out).unwrap();
    assert!(text.starts_with("<html><body><svg style=\"display:none\">"));
    assert!(text.contains("<symbol id=\"nav.home\""));
}

#[test]
fn test_png_response_is_not_buffered_or_modified() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let mut used = UsedIcons::new();
    Icon::new("nav.home").render(injector.registry(), &mut used);

    let mut rewriter = injector.begin(&Method::GET, "/avatar");
    let (mut parts, ()) = http::Response::builder()
        .status(200)
        .header(CONTENT_TYPE, "image/png")
        .header(CONTENT_LENGTH, "4")
        .body(())
        .unwrap()
        .into_parts();
    rewriter.start(&mut parts);
    assert!(!rewriter.is_buffering());
    assert!(parts.headers.contains_key(CONTENT_LENGTH));

    let chunk = Bytes::from_static(b"\x89PNG");
    assert_eq!(rewriter.push_chunk(chunk.clone(), false, &used), Some(chunk));
}

#[test]
fn test_unknown_icon_renders_fallback_and_injects_it() {
    let dir = tempfile::tempdir().unwrap();
    let injector = build_injector(dir.path());

    let page = serve_page(&injector, &["nav.nonexistent"]);
    assert!(page.contains("<use href=\"#icons.question\"/>"));
    assert!(page.contains("<symbol id=\"icons.question\""));
    assert!(!page.contains("nav.nonexistent"));
}

#[test]
fn test_concurrent_requests_see_only_their_own_icons() {
    let dir = tempfile::tempdir().unwrap();
    let injector = Arc::new(build_injector(dir.path()));

    std::thread::scope(|scope| {
        let home = scope.spawn({
            let injector = Arc::clone(&injector);
            move || serve_page(&injector, &["nav.home"])
        });
        let search = scope.spawn({
            let injector = Arc::clone(&injector);
            move || serve_page(&injector, &["nav.search"])
        });

        let home_page = home.join().unwrap();
        let search_page = search.join().unwrap();

        assert!(home_page.contains("<symbol id=\"nav.home\""));
        assert!(!home_page.contains("<symbol id=\"nav.search\""));
        assert!(search_page.contains("<symbol id=\"nav.search\""));
        assert!(!search_page.contains("<symbol id=\"nav.home\""));
    });
}
