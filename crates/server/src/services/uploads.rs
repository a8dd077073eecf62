//! Image upload proxy.
//!
//! Files never touch disk: each one is held in memory, base64-encoded and
//! forwarded to the configured image host (an imgbb-shaped API taking the
//! key as a query parameter and the payload form-encoded). The response
//! carries the hosted URLs in upload order.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::ImageHostConfig;
use crate::error::{AppError, Result};

/// Maximum number of files per upload request.
pub const MAX_FILES: usize = 5;

/// Maximum size of a single file, in bytes.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted file extensions, lowercase.
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Hosted URLs for an accepted upload batch, in upload order.
#[derive(Debug, Serialize)]
pub struct UploadedFiles {
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: bool,
    data: Option<HostData>,
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct HostData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct HostError {
    message: String,
}

/// HTTP client for the image host.
#[derive(Clone)]
pub struct ImageHostClient {
    http: reqwest::Client,
    url: String,
    key: secrecy::SecretString,
}

impl ImageHostClient {
    #[must_use]
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            key: config.key.clone(),
        }
    }

    /// Forward a batch of in-memory files to the image host.
    ///
    /// # Errors
    ///
    /// `Validation` when the batch is empty, and `Upstream` when the host
    /// rejects any file or cannot be reached. The batch is not transactional:
    /// files accepted before a failure stay hosted.
    pub async fn upload(&self, files: Vec<(String, Vec<u8>)>) -> Result<UploadedFiles> {
        if files.is_empty() {
            return Err(AppError::Validation("no files uploaded".to_owned()));
        }

        let mut urls = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            tracing::debug!(file = %name, size = bytes.len(), "forwarding upload to image host");
            urls.push(self.upload_one(&bytes).await?);
        }

        Ok(UploadedFiles { files: urls })
    }

    async fn upload_one(&self, bytes: &[u8]) -> Result<String> {
        let encoded = BASE64.encode(bytes);

        let response = self
            .http
            .post(&self.url)
            .query(&[("key", self.key.expose_secret())])
            .form(&[("image", encoded)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image host unreachable: {e}")))?;

        let status = response.status();
        let body: HostResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("image host sent invalid response: {e}")))?;

        if !status.is_success() || !body.success {
            let reason = body
                .error
                .map_or_else(|| format!("status {status}"), |e| e.message);
            return Err(AppError::Upstream(format!("image host upload failed: {reason}")));
        }

        body.data
            .map(|d| d.url)
            .ok_or_else(|| AppError::Upstream("image host response missing url".to_owned()))
    }
}

/// Validate one incoming file before it is buffered.
///
/// # Errors
///
/// `Validation` for a missing/unsupported extension or an oversized file.
pub fn validate_file(name: &str, size: usize) -> Result<()> {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(AppError::Validation(format!(
                "unsupported file type: {name}"
            )));
        }
    }

    if size > MAX_FILE_BYTES {
        return Err(AppError::Validation(format!(
            "file too large: {name} exceeds {MAX_FILE_BYTES} bytes"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_usual_image_extensions() {
        for name in ["a.jpg", "b.JPEG", "c.png", "d.gif"] {
            assert!(validate_file(name, 1024).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_other_extensions_and_missing_ones() {
        for name in ["evil.exe", "doc.pdf", "noextension", "archive.tar.gz"] {
            assert!(
                matches!(validate_file(name, 1024), Err(AppError::Validation(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn rejects_oversized_files() {
        assert!(validate_file("big.png", MAX_FILE_BYTES + 1).is_err());
        assert!(validate_file("fits.png", MAX_FILE_BYTES).is_ok());
    }
}
