use mapsnag_core::pairing::{base_name, map_files, pair_files};

fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|s| s.to_string()).collect()
}

#[test]
fn pairs_plain_js_and_map() {
    let pairs = pair_files(&files(&["assets/app.js", "assets/app.map"]));
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].js_file.as_deref(), Some("assets/app.js"));
    assert_eq!(pairs[0].map_file, "assets/app.map");
}

#[test]
fn pairs_fingerprinted_files() {
    let dist = files(&[
        "index.html",
        "assets/app-3f2a9c.js",
        "assets/app-9d8e7f.map",
        "assets/vendor-aa11bb.js",
        "assets/vendor-cc22dd.map",
        "robots.txt",
    ]);
    let pairs = pair_files(&dist);
    assert_eq!(pairs.len(), 2);
    for pair in &pairs {
        let js = pair.js_file.as_deref().expect("every map has a js partner");
        assert_eq!(base_name(js), base_name(&pair.map_file));
    }
    assert_eq!(pairs[0].js_file.as_deref(), Some("assets/app-3f2a9c.js"));
    assert_eq!(pairs[1].js_file.as_deref(), Some("assets/vendor-aa11bb.js"));
}

#[test]
fn unmatched_map_yields_none_without_panicking() {
    let pairs = pair_files(&files(&["assets/orphan-1234ab.map"]));
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].js_file, None);
    assert_eq!(pairs[0].map_file, "assets/orphan-1234ab.map");
}

#[test]
fn base_name_strips_fingerprint_and_extension() {
    assert_eq!(base_name("assets/app-3f2a9c.js"), "assets/app");
    assert_eq!(base_name("assets/app-3f2a9c.map"), "assets/app");
}

#[test]
fn base_name_without_fingerprint_only_drops_extension() {
    assert_eq!(base_name("assets/app.js"), "assets/app");
    // Idempotent: a second pass changes nothing.
    assert_eq!(base_name(&base_name("assets/app-3f2a9c.js")), "assets/app");
}

#[test]
fn base_name_ignores_dots_in_directories() {
    assert_eq!(base_name("assets/v1.2/app"), "assets/v1.2/app");
}

#[test]
fn map_files_filters_to_asset_maps_in_order() {
    let dist = files(&[
        "assets/b-12ab34.map",
        "assets/a.js",
        "assets/a-ff00ee.map",
        "index.html",
        "other/skip.map",
    ]);
    assert_eq!(
        map_files(&dist),
        files(&["assets/b-12ab34.map", "assets/a-ff00ee.map"])
    );
}

#[test]
fn output_order_follows_map_file_order() {
    let dist = files(&[
        "assets/z-01.map",
        "assets/a-02.map",
        "assets/z-03.js",
        "assets/a-04.js",
    ]);
    let pairs = pair_files(&dist);
    assert_eq!(pairs[0].map_file, "assets/z-01.map");
    assert_eq!(pairs[1].map_file, "assets/a-02.map");
}
