//! Object storage for uploaded files (resumes, company logos).

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::Multipart;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub const RESUME_PREFIX: &str = "resumes";
pub const LOGO_PREFIX: &str = "company-logos";

/// A single file read from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn extension(&self) -> Option<String> {
        self.file_name.as_deref().and_then(file_extension)
    }
}

/// Reads the multipart field named `field_name`. Other fields are skipped.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "Multipart field '{field_name}' is required"
    )))
}

/// Builds `<prefix>/<owner>-<uuid>[.<ext>]`.
pub fn object_key(prefix: &str, owner: &str, extension: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match extension {
        Some(ext) => format!("{prefix}/{owner}-{id}.{ext}"),
        None => format!("{prefix}/{owner}-{id}"),
    }
}

/// Lower-cased extension of a file name, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Uploads an object and returns its public URL.
pub async fn upload_object(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    public_base: &str,
    key: &str,
    file: UploadedFile,
) -> Result<String, AppError> {
    let content_type = file
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(file.bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Upload of {key} failed: {e}")))?;

    info!("Uploaded s3://{}/{}", bucket, key);
    Ok(public_url(public_base, key))
}
