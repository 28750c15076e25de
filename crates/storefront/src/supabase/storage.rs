//! Product image uploads.

use tracing::{debug, instrument};
use uuid::Uuid;

use super::client::SupabaseClient;
use crate::remote::RemoteError;

/// Folder inside the bucket that product images land in.
const PRODUCT_IMAGE_PREFIX: &str = "products";

impl SupabaseClient {
    /// Upload an image to the configured bucket and return its public URL.
    ///
    /// Files are stored under a fresh random name so uploads never collide.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidInput` for content types without a known
    /// image extension, or an error if the upload fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len(), content_type))]
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let ext = image_extension(content_type).ok_or_else(|| {
            RemoteError::InvalidInput(format!("unsupported image type: {content_type}"))
        })?;
        let path = format!("{PRODUCT_IMAGE_PREFIX}/{}.{ext}", Uuid::new_v4());

        let request = self
            .inner
            .http
            .post(self.endpoint(&format!(
                "storage/v1/object/{}/{path}",
                self.inner.bucket
            )))
            .header("Content-Type", content_type)
            .body(bytes);

        self.send(request).await?;

        let url = self.public_url(&path);
        debug!(%url, "Image uploaded");
        Ok(url)
    }

    /// Public URL of an object in the configured bucket.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        self.endpoint(&format!(
            "storage/v1/object/public/{}/{}",
            self.inner.bucket,
            path.trim_start_matches('/')
        ))
    }
}

/// File extension for an image MIME type.
pub(crate) fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        "image/heif" => Some("heif"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}
