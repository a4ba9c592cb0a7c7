use std::sync::atomic::Ordering;

use super::*;
use crate::assets::AssetRef;
use crate::diagnostics::Warning;

#[test]
fn repeated_reference_is_fetched_once() {
    let raw = r#"{"doc":{"content":[
        {"type":"image","attrs":{"boxFileId":"77","fileName":"a.png"}},
        {"type":"image","attrs":{"boxFileId":"77","fileName":"a.png"}}
    ]}}"#;

    let fetcher = StaticFetcher::new().with_asset("77", FAKE_PNG, "image/png");
    let calls = fetcher.call_counter();
    let mut ctx = ctx_with_fetcher(fetcher);

    let out = Boxlite::new(raw)
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.matches("<img ").count(), 2);
}

#[test]
fn resolved_asset_embeds_as_data_url() {
    let fetcher = StaticFetcher::new().with_asset("9", FAKE_PNG, "image/png");
    let mut ctx = ctx_with_fetcher(fetcher);

    let out = Boxlite::new(image_doc("9"))
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    assert!(out.contains("src=\"data:image/png;base64,"));
    assert!(out.contains("<p>after</p>"));
    assert!(ctx.warnings().is_empty());
}

#[test]
fn missing_asset_degrades_to_placeholder() {
    let mut ctx = ctx_with_fetcher(StaticFetcher::new());

    let out = Boxlite::new(image_doc("nope"))
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    assert!(out.contains("<span class=\"asset-missing\">[image unavailable: photo.png]</span>"));
    // The failure is node-local: the rest of the document renders.
    assert!(out.contains("<p>after</p>"));
    assert!(ctx.warnings().snapshot().iter().any(|w| matches!(
        w,
        Warning::AssetSkipped {
            reason: AssetError::NotFound(_),
            ..
        }
    )));
}

#[test]
fn missing_token_is_unauthorized() {
    let fetcher = StaticFetcher::new().with_asset("5", FAKE_PNG, "image/png");
    let mut ctx = ConversionContext::with_fetcher(&BoxliteFeat::default(), Box::new(fetcher));

    let err = ctx.resolve(&AssetRef::new("5", "a.png")).unwrap_err();
    assert!(matches!(err, AssetError::Unauthorized(_)));

    // The conversion itself still succeeds with a placeholder.
    let out = Boxlite::new(image_doc("5"))
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();
    assert!(out.contains("asset-missing"));
}

#[test]
fn staged_asset_is_written_to_work_dir() {
    let work_dir = std::env::temp_dir().join(format!("boxlite-test-{}", std::process::id()));
    let feat = BoxliteFeat {
        token: Some("test-token".into()),
        work_dir: work_dir.clone(),
        embed_assets: false,
    };
    let fetcher = StaticFetcher::new().with_asset("31", FAKE_PNG, "image/png");
    let mut ctx = ConversionContext::with_fetcher(&feat, Box::new(fetcher));

    let out = Boxlite::new(image_doc("31"))
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    let staged = work_dir.join("31-photo.png");
    assert!(staged.exists());
    assert_eq!(std::fs::read(&staged).unwrap(), FAKE_PNG);
    assert!(out.contains("31-photo.png"));

    std::fs::remove_dir_all(&work_dir).ok();
}

#[test]
fn staged_assets_with_shared_names_do_not_collide() {
    let raw = r#"{"doc":{"content":[
        {"type":"image","attrs":{"boxFileId":"a1","fileName":"photo.png"}},
        {"type":"image","attrs":{"boxFileId":"a2","fileName":"photo.png"}}
    ]}}"#;

    let work_dir = std::env::temp_dir().join(format!("boxlite-collide-{}", std::process::id()));
    let feat = BoxliteFeat {
        token: Some("test-token".into()),
        work_dir: work_dir.clone(),
        embed_assets: false,
    };
    let fetcher = StaticFetcher::new()
        .with_asset("a1", b"FIRST", "image/png")
        .with_asset("a2", b"SECOND", "image/png");
    let mut ctx = ConversionContext::with_fetcher(&feat, Box::new(fetcher));

    Boxlite::new(raw)
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    assert_eq!(std::fs::read(work_dir.join("a1-photo.png")).unwrap(), b"FIRST");
    assert_eq!(std::fs::read(work_dir.join("a2-photo.png")).unwrap(), b"SECOND");

    std::fs::remove_dir_all(&work_dir).ok();
}

#[test]
fn hostile_file_name_cannot_escape_work_dir() {
    let raw = r#"{"doc":{"content":[
        {"type":"image","attrs":{"boxFileId":"esc","fileName":"../escape.png"}}
    ]}}"#;

    let work_dir = std::env::temp_dir().join(format!("boxlite-escape-{}", std::process::id()));
    let feat = BoxliteFeat {
        token: Some("test-token".into()),
        work_dir: work_dir.clone(),
        embed_assets: false,
    };
    let fetcher = StaticFetcher::new().with_asset("esc", FAKE_PNG, "image/png");
    let mut ctx = ConversionContext::with_fetcher(&feat, Box::new(fetcher));

    Boxlite::new(raw)
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    // The supplied name is discarded; staging falls back to the id.
    assert!(work_dir.join("esc.png").exists());
    assert!(!work_dir.parent().unwrap().join("escape.png").exists());

    std::fs::remove_dir_all(&work_dir).ok();
}

#[test]
fn failed_resolution_is_not_retried() {
    let raw = r#"{"doc":{"content":[
        {"type":"image","attrs":{"boxFileId":"gone","fileName":"a.png"}},
        {"type":"image","attrs":{"boxFileId":"gone","fileName":"a.png"}}
    ]}}"#;

    let fetcher = StaticFetcher::new();
    let calls = fetcher.call_counter();
    let mut ctx = ctx_with_fetcher(fetcher);

    let out = Boxlite::new(raw)
        .with_format(Format::Html)
        .convert_with(&mut ctx)
        .unwrap();

    // The failure is cached like a success: one fetch, two placeholders.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.matches("asset-missing").count(), 2);
}

#[test]
fn plain_text_never_resolves_assets() {
    let fetcher = StaticFetcher::new();
    let calls = fetcher.call_counter();
    let mut ctx = ctx_with_fetcher(fetcher);

    let out = Boxlite::new(image_doc("unfetched"))
        .with_format(Format::Text)
        .convert_with(&mut ctx)
        .unwrap();

    assert_eq!(out, "after");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(ctx.warnings().is_empty());
}
