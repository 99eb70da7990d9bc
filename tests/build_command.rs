#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for the `build` command.
//!
//! These tests run the command handler against throwaway projects and inspect
//! the artifacts it leaves on disk.

mod common;

use common::{TestContextBuilder, logger, select};
use tokens_cli::commands;

const ACME_WEB: &str = "brands = [\"acme\"]\nplatforms = [\"web\"]\n";

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn scss_variables_for_a_single_brand() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "#336699" } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    insta::assert_snapshot!(ctx.read("output/web/acme/tokens.scss"), @r"
    // Do not edit directly, this file was auto-generated.

    $token-color-brand: #336699;
    ");
}

#[test]
fn aliases_resolve_across_brand_and_global_sources() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "{color.base.blue.value}" } } }"##,
        )
        .with_global_tokens(
            "base/color.json",
            r##"{ "color": { "base": { "blue": { "value": "#336699" } } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    let scss = ctx.read("output/web/acme/tokens.scss");
    assert!(scss.contains("$token-color-brand: #336699;"), "{scss}");
    assert!(!scss.contains('{'), "residual reference in {scss}");

    let es6 = ctx.read("output/web/acme/tokens.es6.js");
    assert!(es6.contains("export const TOKEN_COLOR_BRAND = \"#336699\";"), "{es6}");
}

#[test]
fn flat_json_round_trips_paths_and_values() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "#336699" }, "accent": { "value": "{color.brand.value}" } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&ctx.read("output/web/acme/tokens.json")).unwrap();
    let pairs: Vec<(String, String)> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            let path: Vec<&str> = t["path"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p.as_str().unwrap())
                .collect();
            (path.join("."), t["value"].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("color.brand".to_string(), "#336699".to_string()),
            ("color.accent".to_string(), "#336699".to_string()),
        ]
    );
}

// ---------------------------------------------------------------------------
// Platform conversions
// ---------------------------------------------------------------------------

#[test]
fn ios_converts_px_to_pt_and_filters_colors() {
    let ctx = TestContextBuilder::new()
        .with_config("brands = [\"acme\"]\nplatforms = [\"ios\"]\n")
        .with_templates()
        .with_brand_tokens(
            "acme",
            "tokens.json",
            r##"{ "color": { "brand": { "value": "#336699" } }, "size": { "body": { "value": "16px" } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    let all = ctx.read("output/ios/acme/tokens-all.plist");
    assert!(all.contains("<key>tokenSizeBody</key><string>16pt</string>"), "{all}");
    assert!(all.contains("<key>tokenColorBrand</key>"), "{all}");

    let colors = ctx.read("output/ios/acme/tokens-colors.plist");
    assert!(colors.contains("tokenColorBrand"), "{colors}");
    assert!(!colors.contains("tokenSizeBody"), "size leaked into colors: {colors}");
}

#[test]
fn android_converts_px_to_dp() {
    let ctx = TestContextBuilder::new()
        .with_config("brands = [\"acme\"]\nplatforms = [\"android\"]\n")
        .with_templates()
        .with_brand_tokens(
            "acme",
            "tokens.json",
            r##"{ "size": { "body": { "value": "16px" } }, "color": { "brand": { "value": "#336699" } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    let all = ctx.read("output/android/acme/tokens-all.xml");
    assert!(all.contains("<dimen name=\"tokenSizeBody\">16dp</dimen>"), "{all}");
    assert!(all.contains("<color name=\"tokenColorBrand\">#336699</color>"), "{all}");
}

#[test]
fn flutter_files_receive_only_their_category() {
    let ctx = TestContextBuilder::new()
        .with_config("brands = [\"acme\"]\nplatforms = [\"flutter\"]\n")
        .with_templates()
        .with_brand_tokens(
            "acme",
            "tokens.json",
            r##"{ "color": { "brand": { "value": "#336699" } }, "spacing": { "m": { "value": 16 } } }"##,
        )
        .build();

    commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build")).unwrap();

    let colors = ctx.read("output/flutter/acme/colors.dart");
    assert!(colors.contains("class FhColors {"), "{colors}");
    assert!(colors.contains("colorBrand = Color(0xFF336699);"), "{colors}");
    assert!(!colors.contains("spacing"), "{colors}");

    let dimensions = ctx.read("output/flutter/acme/dimensions.dart");
    assert!(dimensions.contains("static const double spacingM = 16.0;"), "{dimensions}");
    assert!(!dimensions.contains("color"), "{dimensions}");
}

// ---------------------------------------------------------------------------
// Run behaviour
// ---------------------------------------------------------------------------

#[test]
fn second_build_leaves_artifacts_untouched() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "#336699" } } }"##,
        )
        .build();
    let global = ctx.global(false);

    commands::build::run(&global, &select(&[], &[]), &logger("build")).unwrap();
    let first = ctx.read("output/web/acme/tokens.json");
    let modified = std::fs::metadata(ctx.path("output/web/acme/tokens.json"))
        .unwrap()
        .modified()
        .unwrap();

    commands::build::run(&global, &select(&[], &[]), &logger("build")).unwrap();
    assert_eq!(ctx.read("output/web/acme/tokens.json"), first);
    assert_eq!(
        std::fs::metadata(ctx.path("output/web/acme/tokens.json"))
            .unwrap()
            .modified()
            .unwrap(),
        modified
    );
}

#[test]
fn dry_run_writes_nothing() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens("acme", "color.json", r##"{ "color": { "a": { "value": "#000" } } }"##)
        .build();

    commands::build::run(&ctx.global(true), &select(&[], &[]), &logger("build")).unwrap();
    assert!(!ctx.path("output").exists());
}

#[test]
fn selection_builds_only_requested_pairs() {
    let ctx = TestContextBuilder::new()
        .with_config("brands = [\"a\", \"b\"]\nplatforms = [\"web\"]\n")
        .with_brand_tokens("a", "c.json", r##"{ "color": { "x": { "value": "#111" } } }"##)
        .with_brand_tokens("b", "c.json", r##"{ "color": { "x": { "value": "#222" } } }"##)
        .build();

    commands::build::run(&ctx.global(false), &select(&["b"], &[]), &logger("build")).unwrap();
    assert!(!ctx.path("output/web/a").exists());
    assert!(ctx.path("output/web/b/tokens.scss").is_file());
}

#[test]
fn missing_template_fails_its_pair_but_not_the_others() {
    let ctx = TestContextBuilder::new()
        .with_config("brands = [\"acme\"]\nplatforms = [\"web\", \"ios\"]\n")
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "#336699" } } }"##,
        )
        .build();

    let err = commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build"))
        .unwrap_err();
    assert!(err.to_string().contains("ios/acme"), "{err}");

    assert!(ctx.path("output/web/acme/tokens.scss").is_file());
    assert!(ctx.path("output/styleguide/web_acme.json").is_file());
    assert!(!ctx.path("output/ios/acme").exists());
}

#[test]
fn unresolved_alias_fails_the_build() {
    let ctx = TestContextBuilder::new()
        .with_config(ACME_WEB)
        .with_brand_tokens(
            "acme",
            "color.json",
            r##"{ "color": { "brand": { "value": "{color.missing.value}" } } }"##,
        )
        .build();

    let err = commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build"))
        .unwrap_err();
    assert!(err.to_string().contains("web/acme"), "{err}");
    assert!(!ctx.path("output").exists());
}

#[test]
fn invalid_configuration_is_reported_before_building() {
    let ctx = TestContextBuilder::new()
        .with_config("[platform_targets]\nweb = [\"web/css\"]\n")
        .build();

    let err = commands::build::run(&ctx.global(false), &select(&[], &[]), &logger("build"))
        .unwrap_err();
    assert!(err.to_string().contains("web/css"), "{err}");
}
