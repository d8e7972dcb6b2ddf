use reqwest::Client;
use thiserror::Error;

use crate::cleanup::{delete_sourcemaps, CleanupError};
use crate::config::{ConfigError, DeployContext, RawConfig, Settings};
use crate::pairing::pair_files;
use crate::upload::{upload_sourcemaps, UploadError};

#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Cleanup(#[from] CleanupError),
}

/// Lifecycle a deploy pipeline drives after the build step: upload artifacts,
/// then perform any post-upload housekeeping. Validation happens at
/// construction time, before either hook can run.
#[async_trait::async_trait]
pub trait DeployPlugin {
    async fn upload(&self) -> Result<(), UploadError>;
    async fn after_upload(&self) -> Result<(), CleanupError>;
}

/// Uploads minified-JS/source-map pairs to Bugsnag and optionally deletes the
/// local maps afterwards.
#[derive(Debug)]
pub struct BugsnagPlugin {
    settings: Settings,
    client: Client,
}

impl BugsnagPlugin {
    /// Resolve configuration and build the plugin. This is the validation
    /// step: a missing required option fails here, before any network or
    /// filesystem activity.
    pub fn configure(
        raw: RawConfig,
        ctx: &DeployContext,
        env_revision: Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = Settings::resolve(raw, ctx, env_revision)?;
        Ok(Self::new(settings))
    }

    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    /// Swap in a caller-built HTTP client (custom timeouts, proxies).
    pub fn with_client(settings: Settings, client: Client) -> Self {
        Self { settings, client }
    }
}

#[async_trait::async_trait]
impl DeployPlugin for BugsnagPlugin {
    async fn upload(&self) -> Result<(), UploadError> {
        let pairs = pair_files(&self.settings.dist_files);
        upload_sourcemaps(&self.client, &self.settings, &pairs).await
    }

    async fn after_upload(&self) -> Result<(), CleanupError> {
        delete_sourcemaps(&self.settings).await
    }
}

/// Run the full lifecycle: upload, then post-upload cleanup. A failure in
/// either stage aborts the run and propagates to the caller.
pub async fn run_deploy<P: DeployPlugin>(plugin: &P) -> Result<(), DeployError> {
    plugin.upload().await?;
    plugin.after_upload().await?;
    Ok(())
}
