//! Catalog commands.

use std::path::Path;

use tote_core::product_form::ProductForm;
use tote_storefront::error::{self, AppError};
use tote_storefront::state::AppState;

use super::account::sign_in_if_given;
use crate::{Credentials, output};

/// `tote products list`
pub async fn list(state: &AppState, json: bool) -> error::Result<()> {
    let products = state.catalog().list_products().await?;
    output::products(&products, json);
    Ok(())
}

/// `tote products add`
pub async fn add(
    state: &AppState,
    form: &ProductForm,
    credentials: &Credentials,
    json: bool,
) -> error::Result<()> {
    sign_in_if_given(&mut state.auth(), credentials).await?;
    let product = state.catalog().add_product(form).await?;
    output::product(&product, json);
    Ok(())
}

/// `tote upload-image`
pub async fn upload_image(
    state: &AppState,
    path: &Path,
    content_type: Option<String>,
    credentials: &Credentials,
    json: bool,
) -> error::Result<()> {
    let content_type = content_type
        .or_else(|| guess_content_type(path).map(String::from))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "cannot tell the image type of {}; pass --content-type",
                path.display()
            ))
        })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::BadRequest(format!("cannot read {}: {e}", path.display())))?;

    sign_in_if_given(&mut state.auth(), credentials).await?;
    let url = state.catalog().upload_image(bytes, &content_type).await?;
    output::url(&url, json);
    Ok(())
}

/// MIME type for common image file extensions.
fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/b/photo.JPG")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("tote.webp")), Some("image/webp"));
        assert_eq!(guess_content_type(Path::new("notes.txt")), None);
        assert_eq!(guess_content_type(Path::new("no-extension")), None);
    }
}
