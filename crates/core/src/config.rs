use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Fixed Bugsnag source map upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://upload.bugsnag.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required config option: {0}")]
    MissingRequired(&'static str),
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Raw plugin options as supplied by a config file or CLI flags. Field names
/// follow the option names the plugin has always recognized, so a JSON config
/// file uses `apiKey`, `publicUrl`, and so on.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    pub api_key: Option<String>,
    pub public_url: Option<String>,
    pub endpoint: Option<String>,
    pub revision_key: Option<String>,
    pub include_app_version: Option<bool>,
    pub delete_sourcemaps: Option<bool>,
    pub overwrite: Option<bool>,
    pub upload_minified_file: Option<bool>,
    pub concurrency: Option<usize>,
}

/// Per-invocation data supplied by the deploy host: where the build output
/// lives, which files it produced, which of those are gzipped on disk, and
/// the revision being deployed.
#[derive(Clone, Debug, Default)]
pub struct DeployContext {
    pub dist_dir: PathBuf,
    pub dist_files: Vec<String>,
    pub gzipped_files: Vec<String>,
    pub revision_key: Option<String>,
}

/// Immutable resolved settings. Built once by [`Settings::resolve`] before
/// any network or filesystem activity happens.
#[derive(Clone, Debug)]
pub struct Settings {
    pub api_key: String,
    pub public_url: String,
    pub endpoint: Url,
    pub dist_dir: PathBuf,
    pub dist_files: Vec<String>,
    pub gzipped_files: Vec<String>,
    pub revision: Option<String>,
    pub include_app_version: bool,
    pub delete_sourcemaps: bool,
    pub overwrite: bool,
    pub upload_minified_file: bool,
    /// Upper bound on in-flight uploads. `None` fans out every pair at once.
    pub concurrency: Option<usize>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl Settings {
    /// Resolve raw options against the deploy context. `env_revision` is the
    /// caller-supplied environment fallback for the revision key (the CLI
    /// reads `SOURCE_VERSION`); core code never inspects ambient process
    /// state itself.
    ///
    /// Fails with [`ConfigError::MissingRequired`] when `apiKey` or
    /// `publicUrl` is absent.
    pub fn resolve(
        raw: RawConfig,
        ctx: &DeployContext,
        env_revision: Option<String>,
    ) -> Result<Settings, ConfigError> {
        let api_key = non_empty(raw.api_key).ok_or(ConfigError::MissingRequired("apiKey"))?;
        let public_url =
            non_empty(raw.public_url).ok_or(ConfigError::MissingRequired("publicUrl"))?;

        let endpoint = Url::parse(raw.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        let revision = non_empty(raw.revision_key)
            .or_else(|| non_empty(ctx.revision_key.clone()))
            .or_else(|| non_empty(env_revision));

        Ok(Settings {
            api_key,
            public_url,
            endpoint,
            dist_dir: ctx.dist_dir.clone(),
            dist_files: ctx.dist_files.clone(),
            gzipped_files: ctx.gzipped_files.clone(),
            revision,
            include_app_version: raw.include_app_version.unwrap_or(true),
            delete_sourcemaps: raw.delete_sourcemaps.unwrap_or(true),
            overwrite: raw.overwrite.unwrap_or(true),
            upload_minified_file: raw.upload_minified_file.unwrap_or(false),
            concurrency: raw.concurrency,
        })
    }
}
