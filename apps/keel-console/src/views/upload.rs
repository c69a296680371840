use askama::Template;
use askama_web::WebTemplate;

use super::Nav;
use crate::error::{ConsoleError, Result};
use crate::i18n::Catalog;

/// A license file read from the upload widget, waiting for an update confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedLicense {
    pub file_name: String,
    /// File bytes as a binary string: one char per byte, same code point.
    pub content: String,
}

/// Maps each byte to the char with the same code point.
pub fn binary_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Accepts exactly one file no larger than `max_bytes`.
pub fn stage_single_file(files: Vec<(String, Vec<u8>)>, max_bytes: usize) -> Result<StagedLicense> {
    if files.len() != 1 {
        return Err(ConsoleError::Upload("license.upload.error.count"));
    }

    let (file_name, bytes) = files.into_iter().next().ok_or(ConsoleError::Upload("license.upload.error.count"))?;
    if bytes.len() > max_bytes {
        return Err(ConsoleError::Upload("license.upload.error.size"));
    }

    Ok(StagedLicense {
        file_name,
        content: binary_string(&bytes),
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub nav: Nav,
    pub title: String,
    pub submit_label: String,
    pub update_label: String,
    pub upload_error: Option<String>,
    pub preview: Option<String>,
    pub file_name: Option<String>,
}

impl UploadTemplate {
    pub fn new(catalog: &Catalog, staged: Option<&StagedLicense>, upload_error: Option<String>) -> Self {
        Self {
            nav: Nav::new(catalog),
            title: catalog.t("license.upload.title"),
            submit_label: catalog.t("license.upload.submit"),
            update_label: catalog.t("license.update"),
            upload_error,
            preview: staged.map(|s| s.content.clone()),
            file_name: staged.map(|s| s.file_name.clone()),
        }
    }
}
