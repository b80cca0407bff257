use std::path::Path;

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Image reference stored when a listing is created without an upload.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// True when the filename carries one of the accepted image extensions.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce an arbitrary client-supplied name to `[A-Za-z0-9._-]`. Path
/// separators and anything else exotic collapse to underscores, so the
/// result can never escape the media directory.
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write an uploaded product image under `media_root` and return the
/// relative reference stored in the product row. The stored name is
/// prefixed with the owner id and listing title.
pub async fn store_product_image(
    media_root: &Path,
    owner_id: Uuid,
    title: &str,
    original_name: &str,
    data: &[u8],
) -> AppResult<String> {
    if !allowed_file(original_name) {
        return Err(AppError::Validation(format!(
            "unsupported image type: {original_name}"
        )));
    }

    let filename = sanitize_filename(&format!("{owner_id}_{title}_{original_name}"));
    fs::create_dir_all(media_root)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    fs::write(media_root.join(&filename), data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(format!("products/{filename}"))
}

#[cfg(test)]
mod tests {
    use super::{allowed_file, sanitize_filename};

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("archive.tar.jpeg"));
        assert!(!allowed_file("document.pdf"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("trailingdot."));
    }

    #[test]
    fn sanitizer_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("ok-name_1.jpg"), "ok-name_1.jpg");
    }
}
