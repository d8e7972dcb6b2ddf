use std::fs;
use std::path::Path;

use httpmock::prelude::*;
use tempfile::TempDir;

use mapsnag_core::{run_deploy, BugsnagPlugin, ConfigError, DeployContext, RawConfig, Settings};

fn write_dist_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn configure_fails_before_any_io_when_required_config_missing() {
    let ctx = DeployContext::default();
    let err = BugsnagPlugin::configure(RawConfig::default(), &ctx, None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequired("apiKey")));
}

#[tokio::test]
async fn run_deploy_uploads_then_deletes_maps() {
    let server = MockServer::start_async().await;
    let dist = TempDir::new().unwrap();
    let dist_files = ["assets/app-aa11.js", "assets/app-bb22.map"];
    for f in &dist_files {
        write_dist_file(dist.path(), f, b"{}");
    }

    let m = server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200);
    });

    let raw = RawConfig {
        api_key: Some("test-key".to_string()),
        public_url: Some("https://cdn.example.com".to_string()),
        endpoint: Some(server.base_url()),
        ..RawConfig::default()
    };
    let ctx = DeployContext {
        dist_dir: dist.path().to_path_buf(),
        dist_files: dist_files.iter().map(|s| s.to_string()).collect(),
        gzipped_files: vec![],
        revision_key: Some("abc1234".to_string()),
    };

    let settings = Settings::resolve(raw, &ctx, None).unwrap();
    let plugin = BugsnagPlugin::with_client(settings, reqwest::Client::new());
    run_deploy(&plugin).await.unwrap();

    m.assert();
    assert!(!dist.path().join("assets/app-bb22.map").exists());
    assert!(dist.path().join("assets/app-aa11.js").exists());
}

#[tokio::test]
async fn failed_upload_skips_cleanup() {
    let server = MockServer::start_async().await;
    let dist = TempDir::new().unwrap();
    let dist_files = ["assets/app-aa11.js", "assets/app-bb22.map"];
    for f in &dist_files {
        write_dist_file(dist.path(), f, b"{}");
    }

    server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(500);
    });

    let raw = RawConfig {
        api_key: Some("test-key".to_string()),
        public_url: Some("https://cdn.example.com".to_string()),
        endpoint: Some(server.base_url()),
        ..RawConfig::default()
    };
    let ctx = DeployContext {
        dist_dir: dist.path().to_path_buf(),
        dist_files: dist_files.iter().map(|s| s.to_string()).collect(),
        gzipped_files: vec![],
        revision_key: None,
    };

    let plugin = BugsnagPlugin::configure(raw, &ctx, None).unwrap();
    run_deploy(&plugin).await.unwrap_err();

    // The map survives: cleanup only runs after a successful upload stage.
    assert!(dist.path().join("assets/app-bb22.map").exists());
}
