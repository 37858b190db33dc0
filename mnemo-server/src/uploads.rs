//! Image upload storage
//!
//! Uploaded files keep only their extension from the client-supplied name;
//! the stored name is `<epoch-ms>-<random><ext>`.

use mnemo_common::time::epoch_millis;
use mnemo_common::{Error, Result};
use rand::Rng;
use std::path::Path;
use tracing::info;

/// URL prefix under which stored uploads are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Extension of `original_name` including the dot, or empty
///
/// Only ASCII alphanumeric extensions are kept so the stored name can never
/// contain separators.
pub fn safe_extension(original_name: &str) -> String {
    let file_part = original_name.rsplit(['/', '\\']).next().unwrap_or("");
    match file_part.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext)
        }
        _ => String::new(),
    }
}

/// Generate a unique stored file name for an upload
pub fn unique_file_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}{}", epoch_millis(), suffix, safe_extension(original_name))
}

/// Write `bytes` into `uploads_dir` and return the public path
pub async fn store_upload(uploads_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    let file_name = unique_file_name(original_name);
    let written = async {
        tokio::fs::create_dir_all(uploads_dir).await?;
        tokio::fs::write(uploads_dir.join(&file_name), bytes).await
    };
    written.await.map_err(|source| Error::Upload {
        name: original_name.to_string(),
        source,
    })?;
    info!("Stored upload {} ({} bytes)", file_name, bytes.len());

    Ok(format!("{}{}", UPLOADS_URL_PREFIX, file_name))
}
