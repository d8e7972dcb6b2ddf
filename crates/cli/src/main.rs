use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use mapsnag_core::{pair_files, run_deploy, BugsnagPlugin, DeployContext, DeployError, RawConfig};

#[derive(Parser)]
#[command(version, about = "Upload JS source maps to Bugsnag after a deploy")]
struct Cli {
    /// Build output directory to scan for js/map pairs
    #[arg(long, value_name = "DIR")]
    dist_dir: PathBuf,

    /// JSON config file using the plugin option names (apiKey, publicUrl, ...)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bugsnag project API key
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Public base URL the minified assets are served from
    #[arg(long, value_name = "URL")]
    public_url: Option<String>,

    /// Override the upload endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Revision identifier sent as appVersion
    #[arg(long, value_name = "REV")]
    revision: Option<String>,

    /// Relative dist path stored gzipped on disk (repeatable)
    #[arg(long = "gzipped", value_name = "FILE")]
    gzipped_files: Vec<String>,

    /// Keep local source maps after a successful upload
    #[arg(long)]
    keep_sourcemaps: bool,

    /// Do not ask the API to overwrite previously uploaded maps
    #[arg(long)]
    no_overwrite: bool,

    /// Also upload the minified file alongside each source map
    #[arg(long)]
    upload_minified_file: bool,

    /// Bound the number of in-flight uploads
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// List matched js/map pairs without uploading
    #[arg(long)]
    list_pairs: bool,

    /// Print output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    ConfigFile(#[from] serde_json::Error),
    #[error(transparent)]
    Deploy(#[from] DeployError),
}

/// Walk the dist directory and return every file as a /-separated path
/// relative to its root.
fn collect_dist_files(dist_dir: &Path) -> Result<Vec<String>, std::io::Error> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dist_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dist_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        files.push(rel);
    }
    Ok(files)
}

fn resolve_raw_config(cli: &Cli) -> Result<RawConfig, CliError> {
    let mut raw: RawConfig = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => RawConfig::default(),
    };

    // Flags override config-file values.
    if cli.api_key.is_some() {
        raw.api_key = cli.api_key.clone();
    }
    if cli.public_url.is_some() {
        raw.public_url = cli.public_url.clone();
    }
    if cli.endpoint.is_some() {
        raw.endpoint = cli.endpoint.clone();
    }
    if cli.revision.is_some() {
        raw.revision_key = cli.revision.clone();
    }
    if cli.keep_sourcemaps {
        raw.delete_sourcemaps = Some(false);
    }
    if cli.no_overwrite {
        raw.overwrite = Some(false);
    }
    if cli.upload_minified_file {
        raw.upload_minified_file = Some(true);
    }
    if cli.concurrency.is_some() {
        raw.concurrency = cli.concurrency;
    }
    Ok(raw)
}

fn print_pairs(dist_files: &[String], json: bool) {
    let pairs = pair_files(dist_files);
    if json {
        let entries: Vec<serde_json::Value> = pairs
            .iter()
            .map(|p| {
                serde_json::json!({
                    "jsFile": p.js_file,
                    "mapFile": p.map_file,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_default()
        );
    } else {
        for p in &pairs {
            println!("{} -> {}", p.map_file, p.js_file.as_deref().unwrap_or("(no match)"));
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let dist_files = collect_dist_files(&cli.dist_dir)?;
    log::debug!("found {} files under {}", dist_files.len(), cli.dist_dir.display());

    if cli.list_pairs {
        print_pairs(&dist_files, cli.json);
        return Ok(());
    }

    let ctx = DeployContext {
        dist_dir: cli.dist_dir.clone(),
        dist_files,
        gzipped_files: cli.gzipped_files.clone(),
        revision_key: None,
    };
    let raw = resolve_raw_config(&cli)?;

    // The SOURCE_VERSION fallback is read here, at the edge, and handed to
    // the resolver explicitly.
    let env_revision = std::env::var("SOURCE_VERSION").ok();

    let plugin =
        BugsnagPlugin::configure(raw, &ctx, env_revision).map_err(DeployError::from)?;
    run_deploy(&plugin).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
