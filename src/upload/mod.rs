//! Image uploads for the dashboard. Files land under the configured upload
//! root and are served back by the static file host under `/public/uploads`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;

use crate::error::Error;

pub mod endpoints;
pub use endpoints::*;

pub const DEFAULT_FOLDER: &str = "general";
pub const MAX_FOLDER_BYTES: usize = 256;
const PUBLIC_PREFIX: &str = "/public/uploads";
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// The lower-cased extension of an uploaded image, if it is one we accept.
pub fn image_extension(filename: &str) -> Result<String, Error> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());

    match extension {
        Some(extension) if ALLOWED_EXTENSIONS.contains(&extension.as_str()) => Ok(extension),
        _ => Err(Error::UnsupportedFileType {
            filename: filename.to_string(),
        }),
    }
}

/// Folder names become path components, so only a conservative alphabet is
/// accepted.
pub fn upload_folder(folder: Option<&str>) -> Result<String, Error> {
    let folder = match folder.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_FOLDER.to_string()),
        Some(folder) => folder,
    };

    let allowed = folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !allowed {
        return Err(Error::InvalidUploadFolder {
            folder: folder.to_string(),
        });
    }

    Ok(folder.to_string())
}

fn unique_filename(extension: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub url: String,
}

/// Writes `contents` to a fresh file in `root/folder` and returns where it
/// went.
#[tracing::instrument(skip(contents), fields(size = contents.len()))]
pub async fn store_image(
    root: &Path,
    folder: &str,
    extension: &str,
    contents: &[u8],
) -> Result<StoredFile, Error> {
    let directory = root.join(folder);
    tokio::fs::create_dir_all(&directory).await?;

    let filename = unique_filename(extension);
    let path = directory.join(&filename);
    tokio::fs::write(&path, contents).await?;

    tracing::info!(path = %path.display(), "stored upload");

    Ok(StoredFile {
        path,
        url: format!("{}/{}/{}", PUBLIC_PREFIX, folder, filename),
    })
}
