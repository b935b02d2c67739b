//! Multipart upload glue between the web layer and the media store.
//!
//! Ordering is always "write file, then record its path": a crash between
//! the two steps can leave an orphaned file but never a media row pointing
//! at nothing.

use crate::app_config;
use crate::error::OpError;
use crate::storage::{local::LocalStorage, StorageBackend};
use actix_multipart::Field;
use actix_web::error;
use futures::StreamExt;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

static STORAGE: OnceCell<Arc<dyn StorageBackend>> = OnceCell::new();

/// An uploaded file drained out of a multipart field, not yet stored.
pub struct UploadPayload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// The durable result of handing an upload to the media store.
pub struct SavedFile {
    /// Public path recorded in the media row, e.g. `/uploads/{name}`.
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
}

/// Initializes the media store backend from configuration. Panics on an
/// unusable upload directory; the application cannot accept posts without it.
pub fn init() {
    let dir = PathBuf::from(&app_config::get().storage.upload_dir);
    let backend = LocalStorage::new(dir).expect("Upload directory is not usable.");
    if STORAGE.set(Arc::new(backend)).is_err() {
        panic!("filesystem::init called more than once.");
    }
}

fn get_storage() -> &'static Arc<dyn StorageBackend> {
    STORAGE.get().expect("Storage accessed before init.")
}

/// Drains one multipart file field into memory, enforcing the size cap.
/// Returns None for an empty field (the browser submits file inputs even
/// when nothing was selected).
pub async fn read_field(field: &mut Field) -> Result<Option<UploadPayload>, actix_web::Error> {
    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or_default()
        .to_owned();
    let content_type = field
        .content_type()
        .map(|m| m.to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    let max = app_config::get().storage.max_upload_bytes;
    let mut data: Vec<u8> = Vec::new();

    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            log::error!("upload: multipart read error: {}", e);
            error::ErrorBadRequest("Error interpreting uploaded file.")
        })?;
        if data.len() + bytes.len() > max {
            return Err(error::ErrorPayloadTooLarge(format!(
                "Uploaded file exceeds the {} byte limit.",
                max
            )));
        }
        data.extend_from_slice(&bytes);
    }

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadPayload {
        data,
        filename,
        content_type,
    }))
}

/// Writes the payload to the media store under a generated unique name and
/// returns the reference to record. The file is on disk before this returns.
pub async fn save_upload(payload: UploadPayload) -> Result<SavedFile, OpError> {
    let name = unique_name(&payload.filename);
    let file_size = payload.data.len() as i64;

    get_storage().put_object(payload.data, &name).await?;

    Ok(SavedFile {
        file_path: format!("{}/{}", app_config::get().storage.public_path, name),
        file_size,
        file_type: payload.content_type,
    })
}

/// `{uuid}_{original}` with the original name reduced to a safe character
/// set. Uniqueness comes from the uuid; the original is kept for humans.
fn unique_name(original: &str) -> String {
    let safe: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() {
        "upload".to_owned()
    } else {
        safe
    };
    format!("{}_{}", uuid::Uuid::new_v4(), safe)
}

/// Rejects payloads the post workflow should not accept as images.
pub fn is_image(payload: &UploadPayload) -> bool {
    payload.content_type.starts_with("image/")
}

pub fn is_video(payload: &UploadPayload) -> bool {
    payload.content_type.starts_with("video/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_differ_and_keep_extension() {
        let a = unique_name("photo.png");
        let b = unique_name("photo.png");
        assert_ne!(a, b);
        assert!(a.ends_with("_photo.png"));
    }

    #[test]
    fn unique_name_sanitizes_path_separators() {
        let name = unique_name("../../etc/passwd");
        assert!(!name.contains('/'));
    }

    #[test]
    fn unique_name_handles_empty_input() {
        assert!(unique_name("").ends_with("_upload"));
    }

    #[test]
    fn content_type_classification() {
        let img = UploadPayload {
            data: vec![1],
            filename: "a.png".into(),
            content_type: "image/png".into(),
        };
        let vid = UploadPayload {
            data: vec![1],
            filename: "a.mp4".into(),
            content_type: "video/mp4".into(),
        };
        assert!(is_image(&img) && !is_video(&img));
        assert!(is_video(&vid) && !is_image(&vid));
    }
}
