use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::error::ApiError;

/// Split a `data:image/<ext>;base64,<payload>` URL into extension and
/// payload. Anything else is a client error.
fn parse_data_url(data_url: &str) -> Result<(&str, &str), ApiError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| ApiError::Validation("image must be a base64 data URL".into()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ApiError::Validation("image must be a base64 data URL".into()))?;
    let ext = mime
        .strip_prefix("image/")
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| ApiError::Validation("unsupported image type".into()))?;
    Ok((ext, payload))
}

/// Image store backed by a local directory. References handed out are
/// public `media/<file>` paths, never filesystem paths, so the root can
/// live anywhere on disk.
#[derive(Clone)]
pub struct FsImageStore {
    pub root: PathBuf,
}

impl ImageStore for FsImageStore {
    async fn save(&self, data_url: &str) -> Result<String, ApiError> {
        let (ext, payload) = parse_data_url(data_url)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| ApiError::Validation("invalid base64 image payload".into()))?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("image payload is empty".into()));
        }

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("create media directory")?;
        tokio::fs::write(self.root.join(&file_name), &bytes)
            .await
            .context("write image file")?;
        Ok(format!("media/{file_name}"))
    }

    async fn remove(&self, reference: &str) -> Result<(), ApiError> {
        // Only the basename is trusted; the reference comes back from the
        // database.
        let Some(file_name) = Path::new(reference).file_name() else {
            return Ok(());
        };
        if let Err(error) = tokio::fs::remove_file(self.root.join(file_name)).await {
            tracing::warn!(error = %error, reference, "failed to remove image file");
        }
        Ok(())
    }
}
