use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static ASSET_JS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"assets/.*\.js$").unwrap());
static ASSET_MAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"assets/.*\.map$").unwrap());
// Content-hash fingerprint appended for cache busting, e.g. "app-3f2a9c".
// Applied to the stem only, after the extension has been removed.
static FINGERPRINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-[a-f0-9]+$").unwrap());

/// A minified script and the source map that describes it, both relative to
/// the dist directory. `js_file` is `None` when no script shared the map's
/// base name; pairing itself never treats that as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    pub js_file: Option<String>,
    pub map_file: String,
}

/// All dist files under `assets/` with the `.map` extension, in input order.
pub fn map_files(dist_files: &[String]) -> Vec<String> {
    dist_files
        .iter()
        .filter(|f| ASSET_MAP_RE.is_match(f))
        .cloned()
        .collect()
}

fn asset_js_files(dist_files: &[String]) -> Vec<&str> {
    dist_files
        .iter()
        .filter(|f| ASSET_JS_RE.is_match(f))
        .map(String::as_str)
        .collect()
}

fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        // A dot inside a directory component is not an extension separator.
        Some(idx) if !path[idx..].contains('/') => &path[..idx],
        _ => path,
    }
}

/// Canonical join key for a build output file: the path with its extension
/// and trailing fingerprint removed. Stripping a path that carries no
/// fingerprint only removes the extension.
pub fn base_name(path: &str) -> String {
    let stem = strip_extension(path);
    FINGERPRINT_RE.replace(stem, "").into_owned()
}

/// Join every `assets/*.map` file with the `assets/*.js` file sharing its
/// base name. Output order follows the map files' order in `dist_files`.
/// When two JS files normalize to the same base name the later one wins.
pub fn pair_files(dist_files: &[String]) -> Vec<FilePair> {
    let mut js_by_base: HashMap<String, &str> = HashMap::new();
    for js in asset_js_files(dist_files) {
        js_by_base.insert(base_name(js), js);
    }

    map_files(dist_files)
        .into_iter()
        .map(|map_file| {
            let js_file = js_by_base.get(&base_name(&map_file)).map(|s| s.to_string());
            FilePair { js_file, map_file }
        })
        .collect()
}
