use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use thiserror::Error;
use tokio_util::io::ReaderStream;

use crate::config::Settings;
use crate::pairing::FilePair;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("source map has no matching javascript file: {0}")]
    UnmatchedMap(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Join the public base URL and a relative dist path with exactly one slash,
/// producing the `minifiedUrl` the crash reporter will look up stack frames
/// against.
pub fn minified_url(public_url: &str, js_file: &str) -> String {
    format!(
        "{}/{}",
        public_url.trim_end_matches('/'),
        js_file.trim_start_matches('/')
    )
}

/// Text fields of one upload request. `overwrite` is only present when true:
/// the API treats any value for the flag as truthy, so a falsy flag must be
/// omitted rather than sent as `"false"`. `appVersion` is only present when a
/// revision is known and inclusion is enabled.
pub fn form_fields(settings: &Settings, js_file: &str) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("apiKey", settings.api_key.clone()),
        ("minifiedUrl", minified_url(&settings.public_url, js_file)),
    ];
    if settings.overwrite {
        fields.push(("overwrite", settings.overwrite.to_string()));
    }
    if let Some(revision) = settings.revision.as_ref().filter(|_| settings.include_app_version) {
        fields.push(("appVersion", revision.clone()));
    }
    fields
}

fn part_file_name(rel_path: &str) -> String {
    Path::new(rel_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| rel_path.to_string())
}

/// Build the multipart body part for a dist file. Files listed in the gzipped
/// set are eagerly decompressed into memory, so the transport can compute a
/// content length for the part; everything else is streamed straight off
/// disk, where no upfront length is needed.
async fn file_part(settings: &Settings, rel_path: &str) -> Result<Part, UploadError> {
    let full_path = settings.dist_dir.join(rel_path);
    let read_err = |source| UploadError::Read {
        path: full_path.clone(),
        source,
    };

    if settings.gzipped_files.iter().any(|g| g == rel_path) {
        let compressed = tokio::fs::read(&full_path).await.map_err(read_err)?;
        let mut contents = Vec::new();
        MultiGzDecoder::new(compressed.as_slice())
            .read_to_end(&mut contents)
            .map_err(read_err)?;
        Ok(Part::bytes(contents).file_name(part_file_name(rel_path)))
    } else {
        let file = tokio::fs::File::open(&full_path).await.map_err(read_err)?;
        let body = Body::wrap_stream(ReaderStream::new(file));
        Ok(Part::stream(body).file_name(part_file_name(rel_path)))
    }
}

async fn upload_pair(
    client: &Client,
    settings: &Settings,
    pair: &FilePair,
) -> Result<(), UploadError> {
    let js_file = pair
        .js_file
        .as_deref()
        .ok_or_else(|| UploadError::UnmatchedMap(pair.map_file.clone()))?;

    let mut form = Form::new();
    for (name, value) in form_fields(settings, js_file) {
        form = form.text(name, value);
    }
    form = form.part("sourceMap", file_part(settings, &pair.map_file).await?);
    if settings.upload_minified_file {
        form = form.part("minifiedFile", file_part(settings, js_file).await?);
    }

    client
        .post(settings.endpoint.clone())
        .multipart(form)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// POST one multipart request per pair to the upload endpoint. Every request
/// is dispatched and allowed to settle before the aggregate resolves; the
/// first failure (if any) is then returned. With `concurrency` unset all
/// pairs run at once, otherwise at most that many requests are in flight.
pub async fn upload_sourcemaps(
    client: &Client,
    settings: &Settings,
    pairs: &[FilePair],
) -> Result<(), UploadError> {
    log::info!("Uploading sourcemaps to Bugsnag");

    let uploads: Vec<_> = pairs
        .iter()
        .map(|pair| upload_pair(client, settings, pair))
        .collect();
    let results: Vec<Result<(), UploadError>> = match settings.concurrency {
        Some(limit) => {
            stream::iter(uploads)
                .buffer_unordered(limit.max(1))
                .collect()
                .await
        }
        None => future::join_all(uploads).await,
    };

    for result in results {
        result?;
    }

    log::info!("Finished uploading sourcemaps");
    Ok(())
}
