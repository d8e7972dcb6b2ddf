pub mod pairing;
pub use pairing::{base_name, map_files, pair_files, FilePair};
pub mod config;
pub use config::{ConfigError, DeployContext, RawConfig, Settings, DEFAULT_ENDPOINT};
pub mod upload;
pub use upload::{form_fields, minified_url, upload_sourcemaps, UploadError};
pub mod cleanup;
pub use cleanup::{delete_sourcemaps, CleanupError};
pub mod plugin;
pub use plugin::{run_deploy, BugsnagPlugin, DeployError, DeployPlugin};
