use actix_multipart::Multipart;
use actix_web::post;
use actix_web::web::{Data, Json};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::config::UploadSettings;
use crate::error::Error;

use super::{image_extension, store_image, upload_folder, MAX_FOLDER_BYTES};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadBody {
    pub success: bool,
    pub url: String,
}

struct ReceivedImage {
    extension: String,
    contents: Vec<u8>,
}

/// Accepts a multipart form with an `image` file and an optional `folder`.
#[post("/api/upload")]
#[tracing::instrument(skip(settings, payload))]
pub async fn upload_image(
    settings: Data<UploadSettings>,
    mut payload: Multipart,
) -> Result<Json<UploadBody>, Error> {
    let mut folder: Option<String> = None;
    let mut image: Option<ReceivedImage> = None;

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let filename = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .map(str::to_owned)
                    .ok_or(Error::MissingUploadFile)?;
                let extension = image_extension(&filename)?;

                let mut contents = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    if contents.len() + chunk.len() > settings.max_bytes {
                        return Err(Error::UploadTooLarge {
                            max_bytes: settings.max_bytes,
                        });
                    }
                    contents.extend_from_slice(&chunk);
                }

                image = Some(ReceivedImage {
                    extension,
                    contents,
                });
            }
            Some("folder") => {
                let mut contents = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    if contents.len() + chunk.len() > MAX_FOLDER_BYTES {
                        return Err(Error::UploadTooLarge {
                            max_bytes: MAX_FOLDER_BYTES,
                        });
                    }
                    contents.extend_from_slice(&chunk);
                }
                folder = Some(String::from_utf8_lossy(&contents).into_owned());
            }
            _ => while field.try_next().await?.is_some() {},
        }
    }

    let image = image.ok_or(Error::MissingUploadFile)?;
    let folder = upload_folder(folder.as_deref())?;

    let stored = store_image(&settings.root, &folder, &image.extension, &image.contents).await?;

    Ok(Json(UploadBody {
        success: true,
        url: stored.url,
    }))
}
